//! Domain models for the safety-alerts system.

mod fire_station;
mod medical_record;
mod person;
mod views;

pub use fire_station::*;
pub use medical_record::*;
pub use person::*;
pub use views::*;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::sync::Section;

/// Case-insensitive comparison used for every identity key.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// A record stored in one of the three collections and mirrored to one
/// top-level array of the alerts document.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync {
    /// Identity key used for lookups and deletes.
    type Key: ?Sized + fmt::Display;

    /// Document array holding this record type.
    const SECTION: Section;

    /// Case-insensitive identity match.
    fn matches_key(&self, key: &Self::Key) -> bool;

    /// Whether `other` carries the same identity key.
    fn same_identity(&self, other: &Self) -> bool;

    /// Copy the mutable (non-key) fields of `changes` onto `self`.
    fn apply_changes(&mut self, changes: &Self);

    /// Human-readable identity for logs and errors.
    fn identity(&self) -> String;
}

/// Identity key of a person or medical record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameKey {
    pub first_name: String,
    pub last_name: String,
}

impl NameKey {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Case-insensitive match against a first/last name pair.
    pub fn matches(&self, first_name: &str, last_name: &str) -> bool {
        eq_ignore_case(&self.first_name, first_name) && eq_ignore_case(&self.last_name, last_name)
    }

    /// Lowercased form, usable as a hash key for joins.
    pub fn folded(&self) -> (String, String) {
        (self.first_name.to_lowercase(), self.last_name.to_lowercase())
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}
