//! Button callback payloads: `<action>.<draft id>`.
//!
//! The prefix before the first `.` names the action; everything after it is the
//! draft id, even if it contains further dots.

use crate::domain::DraftId;

pub const DELIMITER: char = '.';

const PROCEED: &str = "proceed";
const POST: &str = "post";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    /// Run AI expansion on a seeded draft.
    Proceed(DraftId),
    /// Publish a draft.
    Post(DraftId),
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        let (prefix, id) = data.split_once(DELIMITER)?;
        if id.is_empty() {
            return None;
        }
        let id = DraftId(id.to_string());
        match prefix {
            PROCEED => Some(Self::Proceed(id)),
            POST => Some(Self::Post(id)),
            _ => None,
        }
    }

    pub fn encode(&self) -> String {
        let (prefix, id) = match self {
            Self::Proceed(id) => (PROCEED, id),
            Self::Post(id) => (POST, id),
        };
        format!("{prefix}{DELIMITER}{id}")
    }
}
