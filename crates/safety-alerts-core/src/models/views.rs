//! Derived views returned by the query engine.
//!
//! Views are computed on demand from the three collections and never stored.
//! Ages are [`UNKNOWN_AGE`](crate::age::UNKNOWN_AGE) and medical lists are
//! empty when a resident has no medical record.

use serde::{Deserialize, Serialize};

use super::Person;

/// A child living at the queried address, with the whole household.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChildAlert {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    /// Every resident at the address, adults and the child included.
    pub family_members: Vec<Person>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhoneAlert {
    pub phone: String,
}

/// Resident at a burning address, with the station answering the call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FireResident {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub age: i32,
    /// `None` when no station covers the address.
    pub station: Option<String>,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

/// Resident covered by one of several flooded stations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FloodResident {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub age: i32,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonInfo {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub age: i32,
    pub email: String,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CommunityEmail {
    pub email: String,
}

/// Resident entry of a station coverage summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoveredResident {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone: String,
    pub age: i32,
    pub station: String,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

/// Everyone covered by a station plus adult/child head counts.
///
/// Residents of unknown age appear in `residents` but in neither count.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StationCoverage {
    pub residents: Vec<CoveredResident>,
    pub adult_count: usize,
    pub child_count: usize,
}

impl StationCoverage {
    pub fn is_empty(&self) -> bool {
        self.residents.is_empty()
    }
}
