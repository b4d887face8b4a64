//! Resident models.

use serde::{Deserialize, Serialize};

use super::{eq_ignore_case, NameKey, Record};
use crate::sync::Section;

/// A resident. Identity is the case-insensitive first/last name pair,
/// which cannot change after creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub phone: String,
    pub email: String,
}

impl Person {
    /// Create a person with just a name; contact fields start blank.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Default::default()
        }
    }

    pub fn key(&self) -> NameKey {
        NameKey::new(self.first_name.as_str(), self.last_name.as_str())
    }

    /// Case-insensitive address match.
    pub fn lives_at(&self, address: &str) -> bool {
        eq_ignore_case(&self.address, address)
    }
}

impl Record for Person {
    type Key = NameKey;

    const SECTION: Section = Section::Persons;

    fn matches_key(&self, key: &NameKey) -> bool {
        key.matches(&self.first_name, &self.last_name)
    }

    fn same_identity(&self, other: &Self) -> bool {
        self.matches_key(&other.key())
    }

    fn apply_changes(&mut self, changes: &Self) {
        self.address = changes.address.clone();
        self.city = changes.city.clone();
        self.zip = changes.zip.clone();
        self.phone = changes.phone.clone();
        self.email = changes.email.clone();
    }

    fn identity(&self) -> String {
        self.key().to_string()
    }
}
