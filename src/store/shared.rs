//! In-process dataset shared with a writer.

use std::sync::{Arc, RwLock};

use super::{Dataset, Snapshot, StoreError, StoreFactory};

/// A dataset held in memory behind a lock.
///
/// Cloning shares the same data. `open` snapshots whatever was last
/// committed via [`SharedDataset::replace`] or [`SharedDataset::update`],
/// which is how tests and embedding code stand in for the external
/// simulation writing new results.
#[derive(Debug, Clone, Default)]
pub struct SharedDataset {
    inner: Arc<RwLock<Dataset>>,
}

impl SharedDataset {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            inner: Arc::new(RwLock::new(dataset)),
        }
    }

    /// Replaces the whole dataset.
    pub fn replace(&self, dataset: Dataset) -> Result<(), StoreError> {
        let mut guard = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        *guard = dataset;
        Ok(())
    }

    /// Applies `f` to the dataset under the write lock.
    pub fn update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Dataset),
    {
        let mut guard = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        f(&mut *guard);
        Ok(())
    }
}

impl StoreFactory for SharedDataset {
    type Store = Snapshot;

    fn open(&self) -> Result<Snapshot, StoreError> {
        let dataset = self
            .inner
            .read()
            .map_err(|_| StoreError::Poisoned)?
            .clone();
        Snapshot::index(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Scenario;
    use crate::store::ScheduleStore;

    #[test]
    fn open_sees_committed_updates() {
        let shared = SharedDataset::default();
        let before = shared.open().unwrap();
        assert!(before.scenarios().unwrap().is_empty());

        shared
            .update(|ds| {
                ds.scenarios.push(Scenario {
                    id: 3,
                    name: "after import".to_string(),
                })
            })
            .unwrap();

        // An already-open scope keeps its snapshot.
        assert!(before.scenarios().unwrap().is_empty());
        assert_eq!(shared.open().unwrap().scenarios().unwrap().len(), 1);
    }
}
