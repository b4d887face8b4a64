//! Derived dispatch views joining persons, fire stations and medical records.
//!
//! Every view works on point-in-time copies of the collections it needs and
//! never touches the document. No match is an empty result, not an error.

mod community;
mod household;
mod station;

use std::collections::{HashMap, HashSet};

use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::age::{AgeError, UNKNOWN_AGE};
use crate::models::{MedicalRecord, Person};
use crate::store::{EntityStore, StoreError};

/// Query errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Malformed medical record: {0}")]
    Age(#[from] AgeError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Read-only query engine over an [`EntityStore`].
pub struct AlertQueries<'a> {
    store: &'a EntityStore,
    today: NaiveDate,
}

impl<'a> AlertQueries<'a> {
    /// Queries computing ages against the local calendar date.
    pub fn new(store: &'a EntityStore) -> Self {
        Self::as_of(store, Local::now().date_naive())
    }

    /// Queries computing ages as of `today`.
    pub fn as_of(store: &'a EntityStore, today: NaiveDate) -> Self {
        Self { store, today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn medical_index(&self) -> QueryResult<MedicalIndex> {
        Ok(MedicalIndex::new(self.store.list_medical_records()?))
    }

    /// Lowercased addresses assigned to any of `stations` (exact match on
    /// the station number).
    fn covered_addresses<S: AsRef<str>>(&self, stations: &[S]) -> QueryResult<HashSet<String>> {
        Ok(self
            .store
            .list_fire_stations()?
            .into_iter()
            .filter(|fs| stations.iter().any(|s| s.as_ref() == fs.station))
            .map(|fs| fs.address.to_lowercase())
            .collect())
    }
}

/// Medical records keyed by case-folded name. The first record wins when
/// the store holds duplicates.
struct MedicalIndex {
    by_name: HashMap<(String, String), MedicalRecord>,
}

/// Medical facts of one resident, with "no data" defaults.
struct MedicalSummary {
    age: i32,
    medications: Vec<String>,
    allergies: Vec<String>,
}

impl MedicalIndex {
    fn new(records: Vec<MedicalRecord>) -> Self {
        let mut by_name = HashMap::with_capacity(records.len());
        for record in records {
            by_name.entry(record.key().folded()).or_insert(record);
        }
        Self { by_name }
    }

    fn get(&self, person: &Person) -> Option<&MedicalRecord> {
        self.by_name.get(&person.key().folded())
    }

    /// Age of `person`, or [`UNKNOWN_AGE`] without a medical record.
    fn age_of(&self, person: &Person, today: NaiveDate) -> QueryResult<i32> {
        match self.get(person) {
            Some(record) => Ok(record.age_on(today)?),
            None => Ok(UNKNOWN_AGE),
        }
    }

    fn summary(&self, person: &Person, today: NaiveDate) -> QueryResult<MedicalSummary> {
        match self.get(person) {
            Some(record) => Ok(MedicalSummary {
                age: record.age_on(today)?,
                medications: record.medications.clone(),
                allergies: record.allergies.clone(),
            }),
            None => Ok(MedicalSummary {
                age: UNKNOWN_AGE,
                medications: Vec::new(),
                allergies: Vec::new(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FireStation;

    #[test]
    fn test_medical_index_first_wins() {
        let index = MedicalIndex::new(vec![
            MedicalRecord::new("John", "Boyd", "03/06/1984"),
            MedicalRecord::new("JOHN", "BOYD", "01/01/1990"),
        ]);
        let record = index.get(&Person::new("john", "boyd")).unwrap();
        assert_eq!(record.birthdate, "03/06/1984");
    }

    #[test]
    fn test_summary_defaults_without_record() {
        let index = MedicalIndex::new(Vec::new());
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let summary = index.summary(&Person::new("No", "Record"), today).unwrap();
        assert_eq!(summary.age, UNKNOWN_AGE);
        assert!(summary.medications.is_empty());
        assert!(summary.allergies.is_empty());
    }

    #[test]
    fn test_covered_addresses_exact_station_match() {
        let store = EntityStore::in_memory();
        store
            .insert_fire_station(FireStation::new("1 Elm St", "1"))
            .unwrap();
        store
            .insert_fire_station(FireStation::new("2 Oak Ave", "10"))
            .unwrap();

        let queries = AlertQueries::new(&store);
        let covered = queries.covered_addresses(&["1"]).unwrap();
        assert_eq!(covered, HashSet::from(["1 elm st".to_string()]));
    }
}
