use dashmap::{mapref::entry::Entry, DashMap};

use crate::{domain::DraftId, drafts::Draft, errors::Error, Result};

/// Concurrent registry of live drafts keyed by id.
///
/// `take` is the only way a draft leaves the store, and it is atomic: for a
/// given id exactly one caller gets the draft.
#[derive(Debug, Default)]
pub struct DraftStore {
    drafts: DashMap<DraftId, Draft>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new draft. Ids are unique among live drafts.
    pub fn create(&self, draft: Draft) -> Result<()> {
        match self.drafts.entry(draft.id.clone()) {
            Entry::Occupied(e) => Err(Error::External(format!(
                "draft id {} is already in use",
                e.key()
            ))),
            Entry::Vacant(e) => {
                e.insert(draft);
                Ok(())
            }
        }
    }

    /// Snapshot of the current draft.
    pub fn get(&self, id: &DraftId) -> Option<Draft> {
        self.drafts.get(id).map(|d| d.value().clone())
    }

    /// Replace a live draft; `Expired` if it has already been taken.
    pub fn replace(&self, draft: Draft) -> Result<()> {
        let id = draft.id.clone();
        self.update(&id, move |d| *d = draft)
    }

    /// Mutate a live draft in place; `Expired` if it has already been taken.
    ///
    /// Never re-inserts a removed draft.
    pub fn update(&self, id: &DraftId, f: impl FnOnce(&mut Draft)) -> Result<()> {
        let mut entry = self.drafts.get_mut(id).ok_or(Error::Expired)?;
        f(entry.value_mut());
        Ok(())
    }

    /// Atomically remove and return the draft.
    pub fn take(&self, id: &DraftId) -> Option<Draft> {
        self.drafts.remove(id).map(|(_, d)| d)
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drafts::DraftState;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn draft(id: &str) -> Draft {
        Draft::seeded(DraftId(id.to_string()), "prompt".to_string())
    }

    #[test]
    fn create_get_and_take() {
        let store = DraftStore::new();
        store.create(draft("1")).unwrap();
        assert_eq!(store.get(&DraftId("1".into())).unwrap().text, "prompt");

        let taken = store.take(&DraftId("1".into())).unwrap();
        assert_eq!(taken.id, DraftId("1".into()));
        assert!(store.get(&DraftId("1".into())).is_none());
        assert!(store.take(&DraftId("1".into())).is_none());
    }

    #[test]
    fn duplicate_create_is_rejected() {
        let store = DraftStore::new();
        store.create(draft("1")).unwrap();
        assert!(store.create(draft("1")).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_after_take_does_not_resurrect() {
        let store = DraftStore::new();
        store.create(draft("1")).unwrap();
        store.take(&DraftId("1".into()));

        let res = store.update(&DraftId("1".into()), |d| d.expand("late".into()));
        assert!(matches!(res, Err(Error::Expired)));
        assert!(store.is_empty());
    }

    #[test]
    fn replace_overwrites_live_draft() {
        let store = DraftStore::new();
        store.create(draft("1")).unwrap();
        let mut d = store.get(&DraftId("1".into())).unwrap();
        d.expand("expanded".into());
        store.replace(d).unwrap();

        let got = store.get(&DraftId("1".into())).unwrap();
        assert_eq!(got.text, "expanded");
        assert_eq!(got.state, DraftState::Expanded);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_take_succeeds_exactly_once() {
        let store = Arc::new(DraftStore::new());
        store.create(draft("race")).unwrap();
        let wins = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let store = store.clone();
                let wins = wins.clone();
                tokio::spawn(async move {
                    if store.take(&DraftId("race".into())).is_some() {
                        wins.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for t in tasks {
            t.await.unwrap();
        }

        assert_eq!(wins.load(Ordering::SeqCst), 1);
    }
}
