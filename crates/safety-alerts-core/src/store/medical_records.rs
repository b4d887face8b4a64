//! Medical record store operations.

use super::{EntityStore, StoreResult};
use crate::models::{MedicalRecord, NameKey};

impl EntityStore {
    pub fn list_medical_records(&self) -> StoreResult<Vec<MedicalRecord>> {
        self.medical_records.snapshot()
    }

    /// Get a medical record by name (case-insensitive).
    pub fn find_medical_record(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> StoreResult<Option<MedicalRecord>> {
        self.medical_records
            .find(&NameKey::new(first_name, last_name))
    }

    /// Insert a new medical record and mirror it to the document.
    pub fn insert_medical_record(&self, record: MedicalRecord) -> StoreResult<bool> {
        self.medical_records.insert(record, self.sync())
    }

    pub fn create_medical_record(&self, record: MedicalRecord) -> StoreResult<()> {
        self.medical_records.insert_unique(record, self.sync())
    }

    /// Replace birthdate, medications and allergies of the named record.
    pub fn update_medical_record(&self, record: &MedicalRecord) -> StoreResult<MedicalRecord> {
        self.medical_records.update(record, self.sync())
    }

    pub fn delete_medical_record(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> StoreResult<MedicalRecord> {
        self.medical_records
            .delete(&NameKey::new(first_name, last_name), self.sync())
    }
}
