//! In-memory entity store with write-through persistence.
//!
//! Three independent collections. Reads copy a collection out under a read
//! lock. Mutations to one collection are serialised, staged on a copy, and
//! swapped in only once the document agrees.

mod collection;
mod fire_stations;
mod medical_records;
mod persons;

use std::path::Path;

use thiserror::Error;

use crate::models::{FireStation, MedicalRecord, Person};
use crate::sync::{AlertsDocument, PersistenceSync, Section, SyncError};
use collection::Collection;

/// Store errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl From<SyncError> for StoreError {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::StorageUnavailable { .. } => StoreError::StorageUnavailable(e.to_string()),
            SyncError::Serialize(ref source) if source.is_io() => {
                StoreError::StorageUnavailable(e.to_string())
            }
            SyncError::MalformedDocument { .. } | SyncError::Serialize(_) => {
                StoreError::MalformedInput(e.to_string())
            }
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Authoritative in-memory state for persons, fire stations and medical
/// records.
///
/// Constructed once and shared by reference (or `Arc`) with every component
/// that needs it.
pub struct EntityStore {
    persons: Collection<Person>,
    fire_stations: Collection<FireStation>,
    medical_records: Collection<MedicalRecord>,
    sync: Option<PersistenceSync>,
}

impl EntityStore {
    /// Store without a backing document (for testing).
    pub fn in_memory() -> Self {
        Self {
            persons: Collection::new(),
            fire_stations: Collection::new(),
            medical_records: Collection::new(),
            sync: None,
        }
    }

    /// Empty store mirroring every mutation into `sync`'s document.
    ///
    /// Use [`EntityStore::bootstrap`] to also load the document's contents.
    pub fn with_sync(sync: PersistenceSync) -> Self {
        Self {
            sync: Some(sync),
            ..Self::in_memory()
        }
    }

    /// Path of the backing document, if any.
    pub fn document_path(&self) -> Option<&Path> {
        self.sync.as_ref().map(PersistenceSync::path)
    }

    fn sync(&self) -> Option<&PersistenceSync> {
        self.sync.as_ref()
    }

    /// Append every record of `document` through the plain in-memory path.
    /// Nothing is written back.
    pub fn load_document(&self, document: AlertsDocument) -> StoreResult<()> {
        let AlertsDocument {
            persons,
            firestations,
            medicalrecords,
        } = document;

        tracing::info!(section = %Section::Persons, count = persons.len(), "Loaded section");
        self.persons.extend(persons)?;

        tracing::info!(section = %Section::FireStations, count = firestations.len(), "Loaded section");
        self.fire_stations.extend(firestations)?;

        tracing::info!(section = %Section::MedicalRecords, count = medicalrecords.len(), "Loaded section");
        self.medical_records.extend(medicalrecords)?;

        Ok(())
    }

    /// Current contents as a document, each collection copied under its
    /// own read lock.
    pub fn to_document(&self) -> StoreResult<AlertsDocument> {
        Ok(AlertsDocument {
            persons: self.list_persons()?,
            firestations: self.list_fire_stations()?,
            medicalrecords: self.list_medical_records()?,
        })
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_in_memory_has_no_document() {
        let store = EntityStore::in_memory();
        assert!(store.document_path().is_none());
        assert!(store.list_persons().unwrap().is_empty());
        assert!(store.list_fire_stations().unwrap().is_empty());
        assert!(store.list_medical_records().unwrap().is_empty());
    }

    #[test]
    fn test_load_document_round_trip() {
        let document = AlertsDocument {
            persons: vec![Person::new("John", "Boyd")],
            firestations: vec![FireStation::new("1509 Culver St", "3")],
            medicalrecords: vec![MedicalRecord::new("John", "Boyd", "03/06/1984")],
        };

        let store = EntityStore::in_memory();
        store.load_document(document.clone()).unwrap();
        assert_eq!(store.to_document().unwrap(), document);
    }

    #[test]
    fn test_sync_error_mapping() {
        let unavailable = SyncError::StorageUnavailable {
            path: PathBuf::from("data.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(matches!(
            StoreError::from(unavailable),
            StoreError::StorageUnavailable(_)
        ));

        let malformed = SyncError::MalformedDocument {
            path: PathBuf::from("data.json"),
            reason: "bad".into(),
        };
        assert!(matches!(
            StoreError::from(malformed),
            StoreError::MalformedInput(_)
        ));
    }

    struct FullDisk;

    impl std::io::Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "no space left on device"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_json_io_error_is_storage_unavailable() {
        let io_error = serde_json::to_writer(FullDisk, &serde_json::json!({"persons": []})).unwrap_err();
        assert!(io_error.is_io());
        assert!(matches!(
            StoreError::from(SyncError::Serialize(io_error)),
            StoreError::StorageUnavailable(_)
        ));
    }
}
