//! A single locked collection of records.
//!
//! Mutators are serialised by `writer` and work on a private copy of the
//! records. The copy is swapped in under a brief write lock only once the
//! document agrees, so readers never wait on document I/O.

use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{StoreError, StoreResult};
use crate::models::Record;
use crate::sync::{PersistenceSync, WriteOutcome};

pub(crate) struct Collection<T> {
    records: RwLock<Vec<T>>,
    /// Held by a mutation from its snapshot to its commit.
    writer: Mutex<()>,
}

impl<T: Record> Collection<T> {
    pub(crate) fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            writer: Mutex::new(()),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Vec<T>>> {
        self.records
            .read()
            .map_err(|_| StoreError::LockPoisoned(T::SECTION.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Vec<T>>> {
        self.records
            .write()
            .map_err(|_| StoreError::LockPoisoned(T::SECTION.to_string()))
    }

    fn lock_writer(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.writer
            .lock()
            .map_err(|_| StoreError::LockPoisoned(format!("{} writer", T::SECTION)))
    }

    /// Replace the committed records.
    fn commit(&self, records: Vec<T>) -> StoreResult<()> {
        *self.write()? = records;
        Ok(())
    }

    /// Point-in-time copy of every record.
    pub(crate) fn snapshot(&self) -> StoreResult<Vec<T>> {
        Ok(self.read()?.clone())
    }

    /// First record matching `key`.
    pub(crate) fn find(&self, key: &T::Key) -> StoreResult<Option<T>> {
        Ok(self.read()?.iter().find(|r| r.matches_key(key)).cloned())
    }

    /// Append without touching the document (bulk load).
    pub(crate) fn extend(&self, loaded: Vec<T>) -> StoreResult<()> {
        let _writer = self.lock_writer()?;
        self.write()?.extend(loaded);
        Ok(())
    }

    /// Append `record`. Duplicates are not rejected here.
    ///
    /// Returns `false` when the document already held the key and the
    /// record was therefore not added.
    pub(crate) fn insert(&self, record: T, sync: Option<&PersistenceSync>) -> StoreResult<bool> {
        self.append(record, sync, false)
    }

    /// Append `record` unless the collection or the document already holds
    /// its key.
    pub(crate) fn insert_unique(&self, record: T, sync: Option<&PersistenceSync>) -> StoreResult<()> {
        let identity = record.identity();
        if self.append(record, sync, true)? {
            Ok(())
        } else {
            Err(already_exists::<T>(&identity))
        }
    }

    fn append(&self, record: T, sync: Option<&PersistenceSync>, reject_duplicate: bool) -> StoreResult<bool> {
        let _writer = self.lock_writer()?;
        let mut records = self.snapshot()?;

        if reject_duplicate && records.iter().any(|r| r.same_identity(&record)) {
            return Err(already_exists::<T>(&record.identity()));
        }
        records.push(record);

        if let Some(sync) = sync {
            let last = records.len() - 1;
            if sync.save(&records[..], &records[last])? == WriteOutcome::Skipped {
                return Ok(false);
            }
        }

        self.commit(records)?;
        Ok(true)
    }

    /// Apply the non-key fields of `changes` to the record with the same
    /// identity and return the updated record.
    pub(crate) fn update(&self, changes: &T, sync: Option<&PersistenceSync>) -> StoreResult<T> {
        let _writer = self.lock_writer()?;
        let mut records = self.snapshot()?;
        let index = records
            .iter()
            .position(|r| r.same_identity(changes))
            .ok_or_else(|| not_found::<T>(&changes.identity()))?;

        records[index].apply_changes(changes);

        if let Some(sync) = sync {
            if sync.update(&records[..], &records[index])? == WriteOutcome::Skipped {
                tracing::warn!(
                    section = %T::SECTION,
                    key = %changes.identity(),
                    "Updated record is missing from the document"
                );
            }
        }

        let updated = records[index].clone();
        self.commit(records)?;
        Ok(updated)
    }

    /// Remove the first record matching `key` and return it.
    pub(crate) fn delete(&self, key: &T::Key, sync: Option<&PersistenceSync>) -> StoreResult<T> {
        let _writer = self.lock_writer()?;
        let mut records = self.snapshot()?;
        let index = records
            .iter()
            .position(|r| r.matches_key(key))
            .ok_or_else(|| not_found::<T>(&key.to_string()))?;

        let removed = records.remove(index);

        if let Some(sync) = sync {
            if sync.delete(&records[..], &removed)? == WriteOutcome::Skipped {
                tracing::warn!(
                    section = %T::SECTION,
                    key = %removed.identity(),
                    "Deleted record was already missing from the document"
                );
            }
        }

        self.commit(records)?;
        Ok(removed)
    }
}

fn already_exists<T: Record>(key: &str) -> StoreError {
    StoreError::AlreadyExists(format!("{}/{}", T::SECTION, key))
}

fn not_found<T: Record>(key: &str) -> StoreError {
    StoreError::NotFound(format!("{}/{}", T::SECTION, key))
}
