use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::domain::DraftId;

/// Draft ids from the wall clock in nanoseconds, forced strictly increasing.
///
/// Ids are plain decimal digits, so they never contain the callback delimiter.
#[derive(Debug, Default)]
pub struct DraftIdGenerator {
    last: AtomicU64,
}

impl DraftIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> DraftId {
        let now = Utc::now()
            .timestamp_nanos_opt()
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0);
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => return DraftId(candidate.to_string()),
                Err(actual) => prev = actual,
            }
        }
    }
}
