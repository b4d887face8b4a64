//! Startup bootstrap: one read of the document into a fresh store.

use std::path::PathBuf;

use super::PersistenceSync;
use crate::store::{EntityStore, StoreResult};

impl EntityStore {
    /// Load the alerts document at `path` into a new store that writes
    /// every later mutation back to the same file.
    ///
    /// A missing or unreadable file is `StorageUnavailable`; invalid JSON or
    /// wrongly typed sections are `MalformedInput`. Either way no store is
    /// returned.
    pub fn bootstrap(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let sync = PersistenceSync::new(path);
        let document = sync.read_document()?;

        tracing::info!(path = %sync.path().display(), "Loading alerts document");
        let store = EntityStore::with_sync(sync);
        store.load_document(document)?;
        Ok(store)
    }
}
