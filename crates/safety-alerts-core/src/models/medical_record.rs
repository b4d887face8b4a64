//! Medical record models.

use serde::{Deserialize, Serialize};

use super::{NameKey, Record};
use crate::age::{calculate_age_on, AgeResult};
use crate::sync::Section;

/// Fixed medical information for one named individual. A record may exist
/// without a matching [`Person`](super::Person) and vice versa.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalRecord {
    pub first_name: String,
    pub last_name: String,
    /// `MM/DD/YYYY`, possibly blank.
    pub birthdate: String,
    /// Free-form, may include dosage (e.g. "aznol:350mg").
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

impl MedicalRecord {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birthdate: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            birthdate: birthdate.into(),
            ..Default::default()
        }
    }

    pub fn key(&self) -> NameKey {
        NameKey::new(self.first_name.as_str(), self.last_name.as_str())
    }

    /// Age on the given date, see [`crate::age`].
    pub fn age_on(&self, today: chrono::NaiveDate) -> AgeResult<i32> {
        calculate_age_on(&self.birthdate, today)
    }
}

impl Record for MedicalRecord {
    type Key = NameKey;

    const SECTION: Section = Section::MedicalRecords;

    fn matches_key(&self, key: &NameKey) -> bool {
        key.matches(&self.first_name, &self.last_name)
    }

    fn same_identity(&self, other: &Self) -> bool {
        self.matches_key(&other.key())
    }

    fn apply_changes(&mut self, changes: &Self) {
        self.birthdate = changes.birthdate.clone();
        self.medications = changes.medications.clone();
        self.allergies = changes.allergies.clone();
    }

    fn identity(&self) -> String {
        self.key().to_string()
    }
}
