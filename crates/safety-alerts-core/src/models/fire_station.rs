//! Fire station coverage models.

use serde::{Deserialize, Serialize};

use super::{eq_ignore_case, Record};
use crate::sync::Section;

/// Maps one address to the station responsible for it. The address is the
/// identity key; only the station number can be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FireStation {
    pub address: String,
    /// Station number as written in the document (not necessarily numeric).
    pub station: String,
}

impl FireStation {
    pub fn new(address: impl Into<String>, station: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            station: station.into(),
        }
    }

    pub fn covers(&self, address: &str) -> bool {
        eq_ignore_case(&self.address, address)
    }
}

impl Record for FireStation {
    type Key = str;

    const SECTION: Section = Section::FireStations;

    fn matches_key(&self, address: &str) -> bool {
        self.covers(address)
    }

    fn same_identity(&self, other: &Self) -> bool {
        self.covers(&other.address)
    }

    fn apply_changes(&mut self, changes: &Self) {
        self.station = changes.station.clone();
    }

    fn identity(&self) -> String {
        self.address.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_ignores_case() {
        let station = FireStation::new("1 Elm St", "2");
        assert!(station.covers("1 ELM ST"));
        assert!(!station.covers("1 Elm"));
    }

    #[test]
    fn test_apply_changes_keeps_address() {
        let mut station = FireStation::new("1 Elm St", "2");
        station.apply_changes(&FireStation::new("9 Oak Ave", "4"));
        assert_eq!(station, FireStation::new("1 Elm St", "4"));
    }
}
