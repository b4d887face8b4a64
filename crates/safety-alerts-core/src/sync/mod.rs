//! Write-through persistence of the entity store to a single JSON document.
//!
//! Every mutation reads the current document, replaces the one top-level
//! array belonging to the mutated collection with the store's updated
//! snapshot, and writes the whole document back atomically.

mod document;
mod loader;
mod writer;

pub use document::*;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use crate::models::Record;

/// Persistence errors.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Storage unavailable at {path}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed document at {path}: {reason}")]
    MalformedDocument { path: PathBuf, reason: String },

    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type SyncResult<T> = Result<T, SyncError>;

/// Result of a write-through call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The document was rewritten.
    Written,
    /// Nothing to do; the document was left untouched.
    Skipped,
}

/// Keeps the alerts document in step with the entity store.
pub struct PersistenceSync {
    path: PathBuf,
    /// Held for each read-modify-write cycle. All three collections share
    /// one file, so per-collection locks alone would lose updates.
    document_lock: Mutex<()>,
}

impl PersistenceSync {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and fully decode the document.
    pub fn read_document(&self) -> SyncResult<AlertsDocument> {
        let _guard = self.lock_document();
        let bytes = writer::read_bytes(&self.path)?;
        AlertsDocument::parse(&self.path, &bytes)
    }

    /// Mirror an insert. `records` is the collection including `record`.
    ///
    /// Skipped when the document already holds a record with the same key.
    pub fn save<T: Record>(&self, records: &[T], record: &T) -> SyncResult<WriteOutcome> {
        self.rewrite_section(records, |on_disk: &[T]| {
            !on_disk.iter().any(|existing| existing.same_identity(record))
        })
        .map(|outcome| {
            if outcome == WriteOutcome::Skipped {
                tracing::debug!(
                    section = %T::SECTION,
                    key = %record.identity(),
                    "Record already in document, skipping save"
                );
            }
            outcome
        })
    }

    /// Mirror an update. `records` already carries the updated fields.
    ///
    /// Skipped when the document has no record with that key.
    pub fn update<T: Record>(&self, records: &[T], record: &T) -> SyncResult<WriteOutcome> {
        self.rewrite_section(records, |on_disk: &[T]| {
            on_disk.iter().any(|existing| existing.same_identity(record))
        })
        .map(|outcome| {
            if outcome == WriteOutcome::Skipped {
                tracing::debug!(
                    section = %T::SECTION,
                    key = %record.identity(),
                    "Record not in document, update skipped"
                );
            }
            outcome
        })
    }

    /// Mirror a delete. `records` no longer contains `removed`.
    ///
    /// The file is not touched when the document has no such record.
    pub fn delete<T: Record>(&self, records: &[T], removed: &T) -> SyncResult<WriteOutcome> {
        self.rewrite_section(records, |on_disk: &[T]| {
            on_disk.iter().any(|existing| existing.same_identity(removed))
        })
        .map(|outcome| {
            if outcome == WriteOutcome::Skipped {
                tracing::debug!(
                    section = %T::SECTION,
                    key = %removed.identity(),
                    "Record not in document, delete skipped"
                );
            }
            outcome
        })
    }

    /// Read the document, let `should_write` inspect the section as stored,
    /// and if it agrees replace that section with `records`.
    fn rewrite_section<T, F>(&self, records: &[T], should_write: F) -> SyncResult<WriteOutcome>
    where
        T: Record,
        F: FnOnce(&[T]) -> bool,
    {
        let _guard = self.lock_document();

        let bytes = writer::read_bytes(&self.path)?;
        let mut raw = RawDocument::parse(&self.path, &bytes)?;
        let on_disk: Vec<T> = raw.section(&self.path, T::SECTION)?;

        if !should_write(on_disk.as_slice()) {
            return Ok(WriteOutcome::Skipped);
        }

        raw.replace_section(T::SECTION, records)?;
        if let Err(e) = writer::write_atomic(&self.path, &raw.into_value()) {
            tracing::error!(section = %T::SECTION, path = %self.path.display(), error = %e, "Document write failed");
            return Err(e);
        }

        tracing::info!(
            section = %T::SECTION,
            count = records.len(),
            path = %self.path.display(),
            "Document section rewritten"
        );
        Ok(WriteOutcome::Written)
    }

    fn lock_document(&self) -> std::sync::MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.document_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
