//! Safety Alerts Core Library
//!
//! Emergency dispatch lookups over residents, fire station assignments and
//! medical records, kept in memory and mirrored to one JSON document.
//!
//! # Architecture
//!
//! ```text
//!            alerts document (JSON)
//!                 │  bootstrap (once)
//!                 ▼
//!   ┌──────────────────────────────┐  mutation   ┌─────────────────┐
//!   │         EntityStore          │────────────►│ PersistenceSync │──► document
//!   │ persons │ stations │ records │ write-through└─────────────────┘
//!   └──────────────┬───────────────┘
//!                  │ snapshots
//!                  ▼
//!             AlertQueries ──► child alert, phone alert, fire, flood,
//!                              person info, community email, coverage
//! ```
//!
//! # Modules
//!
//! - [`age`]: Birthdate parsing and child/adult classification
//! - [`models`]: Domain records and derived views
//! - [`store`]: In-memory collections with write-through mutations
//! - [`sync`]: Alerts document layout, atomic writes and bootstrap
//! - [`query`]: Derived dispatch views

pub mod age;
pub mod models;
pub mod query;
pub mod store;
pub mod sync;

// Re-export commonly used types
pub use age::{calculate_age, calculate_age_on, is_adult, is_child, AgeError, UNKNOWN_AGE};
pub use models::{
    ChildAlert, CommunityEmail, CoveredResident, FireResident, FireStation, FloodResident,
    MedicalRecord, NameKey, Person, PersonInfo, PhoneAlert, StationCoverage,
};
pub use query::{AlertQueries, QueryError};
pub use store::{EntityStore, StoreError};
pub use sync::{AlertsDocument, PersistenceSync, SyncError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum SafetyAlertsError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<StoreError> for SafetyAlertsError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => SafetyAlertsError::NotFound(key),
            StoreError::AlreadyExists(key) => SafetyAlertsError::AlreadyExists(key),
            StoreError::MalformedInput(reason) => SafetyAlertsError::MalformedInput(reason),
            StoreError::StorageUnavailable(reason) => SafetyAlertsError::StorageUnavailable(reason),
            StoreError::LockPoisoned(what) => {
                SafetyAlertsError::StorageUnavailable(format!("Lock poisoned: {}", what))
            }
        }
    }
}

impl From<AgeError> for SafetyAlertsError {
    fn from(e: AgeError) -> Self {
        SafetyAlertsError::MalformedInput(e.to_string())
    }
}

impl From<QueryError> for SafetyAlertsError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::Age(e) => e.into(),
            QueryError::Store(e) => e.into(),
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), SafetyAlertsError> {
    if value.trim().is_empty() {
        return Err(SafetyAlertsError::InvalidInput(format!("{} must not be blank", field)));
    }
    Ok(())
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Load the alerts document at the given path. Every later mutation is
/// written back to it.
#[uniffi::export]
pub fn open_alerts_document(path: String) -> Result<Arc<SafetyAlertsCore>, SafetyAlertsError> {
    require("path", &path)?;
    let store = EntityStore::bootstrap(path)?;
    Ok(Arc::new(SafetyAlertsCore {
        store: Arc::new(store),
    }))
}

/// Create a store without a backing document (for testing).
#[uniffi::export]
pub fn open_in_memory() -> Arc<SafetyAlertsCore> {
    Arc::new(SafetyAlertsCore {
        store: Arc::new(EntityStore::in_memory()),
    })
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe store wrapper for FFI.
#[derive(uniffi::Object)]
pub struct SafetyAlertsCore {
    store: Arc<EntityStore>,
}

impl SafetyAlertsCore {
    fn queries(&self) -> AlertQueries<'_> {
        AlertQueries::new(&self.store)
    }
}

#[uniffi::export]
impl SafetyAlertsCore {
    // =========================================================================
    // Person Operations
    // =========================================================================

    pub fn list_persons(&self) -> Result<Vec<FfiPerson>, SafetyAlertsError> {
        let persons = self.store.list_persons()?;
        Ok(persons.into_iter().map(|p| p.into()).collect())
    }

    /// Get a person by first and last name.
    pub fn get_person(
        &self,
        first_name: String,
        last_name: String,
    ) -> Result<Option<FfiPerson>, SafetyAlertsError> {
        require("firstName", &first_name)?;
        require("lastName", &last_name)?;
        let person = self.store.find_person(&first_name, &last_name)?;
        Ok(person.map(|p| p.into()))
    }

    /// Create a person. Fails if one with the same name already exists.
    pub fn create_person(&self, person: FfiPerson) -> Result<FfiPerson, SafetyAlertsError> {
        require("firstName", &person.first_name)?;
        require("lastName", &person.last_name)?;
        let person: Person = person.into();
        self.store.create_person(person.clone())?;
        Ok(person.into())
    }

    /// Replace the contact fields of an existing person.
    pub fn update_person(&self, person: FfiPerson) -> Result<FfiPerson, SafetyAlertsError> {
        require("firstName", &person.first_name)?;
        require("lastName", &person.last_name)?;
        let updated = self.store.update_person(&person.into())?;
        Ok(updated.into())
    }

    pub fn delete_person(
        &self,
        first_name: String,
        last_name: String,
    ) -> Result<FfiPerson, SafetyAlertsError> {
        require("firstName", &first_name)?;
        require("lastName", &last_name)?;
        let removed = self.store.delete_person(&first_name, &last_name)?;
        Ok(removed.into())
    }

    // =========================================================================
    // Fire Station Operations
    // =========================================================================

    pub fn list_fire_stations(&self) -> Result<Vec<FfiFireStation>, SafetyAlertsError> {
        let stations = self.store.list_fire_stations()?;
        Ok(stations.into_iter().map(|s| s.into()).collect())
    }

    /// Get the station assignment of an address.
    pub fn get_fire_station(
        &self,
        address: String,
    ) -> Result<Option<FfiFireStation>, SafetyAlertsError> {
        require("address", &address)?;
        let station = self.store.find_fire_station(&address)?;
        Ok(station.map(|s| s.into()))
    }

    /// Assign a station to an address. Fails if the address is already
    /// assigned.
    pub fn create_fire_station(
        &self,
        fire_station: FfiFireStation,
    ) -> Result<FfiFireStation, SafetyAlertsError> {
        require("address", &fire_station.address)?;
        require("station", &fire_station.station)?;
        let fire_station: FireStation = fire_station.into();
        self.store.create_fire_station(fire_station.clone())?;
        Ok(fire_station.into())
    }

    /// Reassign an address to another station.
    pub fn update_fire_station(
        &self,
        fire_station: FfiFireStation,
    ) -> Result<FfiFireStation, SafetyAlertsError> {
        require("address", &fire_station.address)?;
        require("station", &fire_station.station)?;
        let updated = self.store.update_fire_station(&fire_station.into())?;
        Ok(updated.into())
    }

    pub fn delete_fire_station(&self, address: String) -> Result<FfiFireStation, SafetyAlertsError> {
        require("address", &address)?;
        let removed = self.store.delete_fire_station(&address)?;
        Ok(removed.into())
    }

    // =========================================================================
    // Medical Record Operations
    // =========================================================================

    pub fn list_medical_records(&self) -> Result<Vec<FfiMedicalRecord>, SafetyAlertsError> {
        let records = self.store.list_medical_records()?;
        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    pub fn get_medical_record(
        &self,
        first_name: String,
        last_name: String,
    ) -> Result<Option<FfiMedicalRecord>, SafetyAlertsError> {
        require("firstName", &first_name)?;
        require("lastName", &last_name)?;
        let record = self.store.find_medical_record(&first_name, &last_name)?;
        Ok(record.map(|r| r.into()))
    }

    /// Create a medical record. The birthdate must be blank or MM/dd/yyyy.
    pub fn create_medical_record(
        &self,
        record: FfiMedicalRecord,
    ) -> Result<FfiMedicalRecord, SafetyAlertsError> {
        require("firstName", &record.first_name)?;
        require("lastName", &record.last_name)?;
        calculate_age(&record.birthdate)?;
        let record: MedicalRecord = record.into();
        self.store.create_medical_record(record.clone())?;
        Ok(record.into())
    }

    /// Replace birthdate, medications and allergies of an existing record.
    pub fn update_medical_record(
        &self,
        record: FfiMedicalRecord,
    ) -> Result<FfiMedicalRecord, SafetyAlertsError> {
        require("firstName", &record.first_name)?;
        require("lastName", &record.last_name)?;
        calculate_age(&record.birthdate)?;
        let updated = self.store.update_medical_record(&record.into())?;
        Ok(updated.into())
    }

    pub fn delete_medical_record(
        &self,
        first_name: String,
        last_name: String,
    ) -> Result<FfiMedicalRecord, SafetyAlertsError> {
        require("firstName", &first_name)?;
        require("lastName", &last_name)?;
        let removed = self.store.delete_medical_record(&first_name, &last_name)?;
        Ok(removed.into())
    }

    // =========================================================================
    // Alert Views
    // =========================================================================

    /// Children living at an address, each with the whole household.
    pub fn child_alert(&self, address: String) -> Result<Vec<FfiChildAlert>, SafetyAlertsError> {
        require("address", &address)?;
        let alerts = self.queries().children_at_address(&address)?;
        Ok(alerts.into_iter().map(|a| a.into()).collect())
    }

    /// Phone numbers of everyone covered by a station, repeats included.
    pub fn phone_alert(&self, station: String) -> Result<Vec<String>, SafetyAlertsError> {
        require("station", &station)?;
        let phones = self.queries().phones_by_station(&station)?;
        Ok(phones.into_iter().map(|p| p.phone).collect())
    }

    pub fn fire(&self, address: String) -> Result<Vec<FfiFireResident>, SafetyAlertsError> {
        require("address", &address)?;
        let residents = self.queries().residents_at_address(&address)?;
        Ok(residents.into_iter().map(|r| r.into()).collect())
    }

    /// Residents covered by any of the given stations.
    pub fn flood(&self, stations: Vec<String>) -> Result<Vec<FfiFloodResident>, SafetyAlertsError> {
        if stations.is_empty() {
            return Err(SafetyAlertsError::InvalidInput("stations must not be empty".into()));
        }
        for station in &stations {
            require("station", station)?;
        }
        let residents = self.queries().residents_by_stations(&stations)?;
        Ok(residents.into_iter().map(|r| r.into()).collect())
    }

    pub fn person_info(&self, last_name: String) -> Result<Vec<FfiPersonInfo>, SafetyAlertsError> {
        require("lastName", &last_name)?;
        let info = self.queries().person_info_by_last_name(&last_name)?;
        Ok(info.into_iter().map(|i| i.into()).collect())
    }

    /// Distinct emails of a city's residents.
    pub fn community_email(&self, city: String) -> Result<Vec<String>, SafetyAlertsError> {
        require("city", &city)?;
        let emails = self.queries().emails_by_city(&city)?;
        Ok(emails.into_iter().map(|e| e.email).collect())
    }

    pub fn station_coverage(&self, station: String) -> Result<FfiStationCoverage, SafetyAlertsError> {
        require("station", &station)?;
        let coverage = self.queries().station_coverage(&station)?;
        Ok(coverage.into())
    }

    /// Current store contents as a pretty-printed alerts document.
    pub fn export_document_json(&self) -> Result<String, SafetyAlertsError> {
        let document = self.store.to_document()?;
        document
            .to_json()
            .map_err(|e| SafetyAlertsError::MalformedInput(e.to_string()))
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe person.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPerson {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub phone: String,
    pub email: String,
}

impl From<Person> for FfiPerson {
    fn from(person: Person) -> Self {
        Self {
            first_name: person.first_name,
            last_name: person.last_name,
            address: person.address,
            city: person.city,
            zip: person.zip,
            phone: person.phone,
            email: person.email,
        }
    }
}

impl From<FfiPerson> for Person {
    fn from(person: FfiPerson) -> Self {
        Person {
            first_name: person.first_name,
            last_name: person.last_name,
            address: person.address,
            city: person.city,
            zip: person.zip,
            phone: person.phone,
            email: person.email,
        }
    }
}

/// FFI-safe station assignment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFireStation {
    pub address: String,
    pub station: String,
}

impl From<FireStation> for FfiFireStation {
    fn from(fire_station: FireStation) -> Self {
        Self {
            address: fire_station.address,
            station: fire_station.station,
        }
    }
}

impl From<FfiFireStation> for FireStation {
    fn from(fire_station: FfiFireStation) -> Self {
        FireStation::new(fire_station.address, fire_station.station)
    }
}

/// FFI-safe medical record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicalRecord {
    pub first_name: String,
    pub last_name: String,
    pub birthdate: String,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

impl From<MedicalRecord> for FfiMedicalRecord {
    fn from(record: MedicalRecord) -> Self {
        Self {
            first_name: record.first_name,
            last_name: record.last_name,
            birthdate: record.birthdate,
            medications: record.medications,
            allergies: record.allergies,
        }
    }
}

impl From<FfiMedicalRecord> for MedicalRecord {
    fn from(record: FfiMedicalRecord) -> Self {
        MedicalRecord {
            first_name: record.first_name,
            last_name: record.last_name,
            birthdate: record.birthdate,
            medications: record.medications,
            allergies: record.allergies,
        }
    }
}

/// FFI-safe child alert entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiChildAlert {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub family_members: Vec<FfiPerson>,
}

impl From<ChildAlert> for FfiChildAlert {
    fn from(alert: ChildAlert) -> Self {
        Self {
            first_name: alert.first_name,
            last_name: alert.last_name,
            age: alert.age,
            family_members: alert.family_members.into_iter().map(|p| p.into()).collect(),
        }
    }
}

/// FFI-safe fire resident.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFireResident {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub age: i32,
    pub station: Option<String>,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

impl From<FireResident> for FfiFireResident {
    fn from(resident: FireResident) -> Self {
        Self {
            first_name: resident.first_name,
            last_name: resident.last_name,
            phone: resident.phone,
            age: resident.age,
            station: resident.station,
            medications: resident.medications,
            allergies: resident.allergies,
        }
    }
}

/// FFI-safe flood resident.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFloodResident {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub age: i32,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

impl From<FloodResident> for FfiFloodResident {
    fn from(resident: FloodResident) -> Self {
        Self {
            first_name: resident.first_name,
            last_name: resident.last_name,
            phone: resident.phone,
            age: resident.age,
            medications: resident.medications,
            allergies: resident.allergies,
        }
    }
}

/// FFI-safe person info entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPersonInfo {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub age: i32,
    pub email: String,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

impl From<PersonInfo> for FfiPersonInfo {
    fn from(info: PersonInfo) -> Self {
        Self {
            first_name: info.first_name,
            last_name: info.last_name,
            address: info.address,
            age: info.age,
            email: info.email,
            medications: info.medications,
            allergies: info.allergies,
        }
    }
}

/// FFI-safe covered resident.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCoveredResident {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone: String,
    pub age: i32,
    pub station: String,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

impl From<CoveredResident> for FfiCoveredResident {
    fn from(resident: CoveredResident) -> Self {
        Self {
            first_name: resident.first_name,
            last_name: resident.last_name,
            address: resident.address,
            phone: resident.phone,
            age: resident.age,
            station: resident.station,
            medications: resident.medications,
            allergies: resident.allergies,
        }
    }
}

/// FFI-safe station coverage summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStationCoverage {
    pub residents: Vec<FfiCoveredResident>,
    pub adult_count: u32,
    pub child_count: u32,
}

impl From<StationCoverage> for FfiStationCoverage {
    fn from(coverage: StationCoverage) -> Self {
        Self {
            residents: coverage.residents.into_iter().map(|r| r.into()).collect(),
            adult_count: coverage.adult_count as u32,
            child_count: coverage.child_count as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ffi_person(first: &str, last: &str, address: &str) -> FfiPerson {
        FfiPerson {
            first_name: first.into(),
            last_name: last.into(),
            address: address.into(),
            city: "Culver".into(),
            zip: "97451".into(),
            phone: "841-874-6512".into(),
            email: format!("{}@email.com", first.to_lowercase()),
        }
    }

    #[test]
    fn test_create_person_duplicate() {
        let core = open_in_memory();
        core.create_person(ffi_person("John", "Boyd", "1509 Culver St"))
            .unwrap();

        let err = core
            .create_person(ffi_person("JOHN", "boyd", "elsewhere"))
            .unwrap_err();
        assert!(matches!(err, SafetyAlertsError::AlreadyExists(_)));
        assert_eq!(core.list_persons().unwrap().len(), 1);
    }

    #[test]
    fn test_concurrent_creates_keep_one() {
        let core = open_in_memory();

        let created = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let core = &core;
                    s.spawn(move || core.create_person(ffi_person("John", "Boyd", "1509 Culver St")))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|result| match result {
                    Ok(_) => true,
                    Err(SafetyAlertsError::AlreadyExists(_)) => false,
                    Err(e) => panic!("unexpected error: {e}"),
                })
                .count()
        });

        assert_eq!(created, 1);
        assert_eq!(core.list_persons().unwrap().len(), 1);
    }

    #[test]
    fn test_blank_parameters_rejected() {
        let core = open_in_memory();
        assert!(matches!(
            core.create_person(ffi_person(" ", "Boyd", "x")),
            Err(SafetyAlertsError::InvalidInput(_))
        ));
        assert!(matches!(
            core.child_alert("".into()),
            Err(SafetyAlertsError::InvalidInput(_))
        ));
        assert!(matches!(
            core.flood(vec![]),
            Err(SafetyAlertsError::InvalidInput(_))
        ));
        assert!(matches!(
            open_alerts_document("  ".into()),
            Err(SafetyAlertsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_update_and_delete_missing() {
        let core = open_in_memory();
        assert!(matches!(
            core.update_person(ffi_person("No", "One", "x")),
            Err(SafetyAlertsError::NotFound(_))
        ));
        assert!(matches!(
            core.delete_fire_station("nowhere".into()),
            Err(SafetyAlertsError::NotFound(_))
        ));
        assert!(matches!(
            core.delete_medical_record("No".into(), "One".into()),
            Err(SafetyAlertsError::NotFound(_))
        ));
    }

    #[test]
    fn test_malformed_birthdate_rejected() {
        let core = open_in_memory();
        let record = FfiMedicalRecord {
            first_name: "John".into(),
            last_name: "Boyd".into(),
            birthdate: "1984-03-06".into(),
            medications: vec![],
            allergies: vec![],
        };
        assert!(matches!(
            core.create_medical_record(record),
            Err(SafetyAlertsError::MalformedInput(_))
        ));
        assert!(core.list_medical_records().unwrap().is_empty());
    }

    #[test]
    fn test_views_through_facade() {
        let core = open_in_memory();
        core.create_person(ffi_person("John", "Boyd", "1509 Culver St"))
            .unwrap();
        core.create_person(ffi_person("Jacob", "Boyd", "1509 Culver St"))
            .unwrap();
        core.create_fire_station(FfiFireStation {
            address: "1509 Culver St".into(),
            station: "3".into(),
        })
        .unwrap();

        let phones = core.phone_alert("3".into()).unwrap();
        assert_eq!(phones, vec!["841-874-6512", "841-874-6512"]);

        let fire = core.fire("1509 culver st".into()).unwrap();
        assert_eq!(fire.len(), 2);
        assert_eq!(fire[0].station.as_deref(), Some("3"));
        assert_eq!(fire[0].age, UNKNOWN_AGE);

        let coverage = core.station_coverage("3".into()).unwrap();
        assert_eq!(coverage.residents.len(), 2);
        assert_eq!(coverage.adult_count, 0);

        let emails = core.community_email("culver".into()).unwrap();
        assert_eq!(emails, vec!["john@email.com", "jacob@email.com"]);

        assert_eq!(core.person_info("Boyd".into()).unwrap().len(), 2);
        assert!(core.child_alert("1509 Culver St".into()).unwrap().is_empty());
    }
}
