//! In-memory drafts: the record, its id generator, and the concurrent store.

mod ids;
mod store;

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::domain::DraftId;

pub use ids::DraftIdGenerator;
pub use store::DraftStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftState {
    /// Holds the generation prompt.
    Seeded,
    /// Holds AI-expanded text ready to publish.
    Expanded,
}

/// A post under construction.
#[derive(Clone, Debug)]
pub struct Draft {
    pub id: DraftId,
    pub state: DraftState,
    pub text: String,
    /// Transport file id of the attached image, kept so the image can be fetched again.
    pub image_ref: Option<String>,
    /// Local copy of the image, owned by this draft until deleted.
    pub local_image: Option<PathBuf>,
    pub created_at: DateTime<Utc>,
}

impl Draft {
    pub fn seeded(id: DraftId, prompt: String) -> Self {
        Self {
            id,
            state: DraftState::Seeded,
            text: prompt,
            image_ref: None,
            local_image: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_image(mut self, image_ref: String, local_image: PathBuf) -> Self {
        self.image_ref = Some(image_ref);
        self.local_image = Some(local_image);
        self
    }

    /// Time since the draft was seeded, in whole seconds (never negative).
    pub fn age_secs(&self) -> i64 {
        (Utc::now() - self.created_at).num_seconds().max(0)
    }

    /// Replace the text with an AI expansion.
    pub fn expand(&mut self, text: String) {
        self.text = text;
        self.state = DraftState::Expanded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn expand_keeps_image_and_moves_to_expanded() {
        let mut draft = Draft::seeded(DraftId("1".into()), "prompt".into())
            .with_image("file-1".into(), PathBuf::from("downloads/a.jpg"));
        draft.expand("post text".into());

        assert_eq!(draft.state, DraftState::Expanded);
        assert_eq!(draft.text, "post text");
        assert_eq!(draft.local_image.as_deref(), Some(std::path::Path::new("downloads/a.jpg")));
    }

    #[test]
    fn age_counts_from_seeding() {
        let mut draft = Draft::seeded(DraftId("1".into()), "prompt".into());
        assert!(draft.age_secs() < 5);

        draft.created_at = Utc::now() - Duration::seconds(90);
        assert!((90..95).contains(&draft.age_secs()));

        draft.created_at = Utc::now() + Duration::seconds(30);
        assert_eq!(draft.age_secs(), 0);
    }
}
