//! Fire station assignment store operations.

use super::{EntityStore, StoreResult};
use crate::models::FireStation;

impl EntityStore {
    pub fn list_fire_stations(&self) -> StoreResult<Vec<FireStation>> {
        self.fire_stations.snapshot()
    }

    /// Get the assignment for an address (case-insensitive).
    pub fn find_fire_station(&self, address: &str) -> StoreResult<Option<FireStation>> {
        self.fire_stations.find(address)
    }

    /// Insert a new assignment and mirror it to the document.
    pub fn insert_fire_station(&self, fire_station: FireStation) -> StoreResult<bool> {
        self.fire_stations.insert(fire_station, self.sync())
    }

    /// Insert an assignment unless the address is already assigned.
    pub fn create_fire_station(&self, fire_station: FireStation) -> StoreResult<()> {
        self.fire_stations.insert_unique(fire_station, self.sync())
    }

    /// Change the station number of an existing address.
    ///
    /// The address is the key; an unknown address is `NotFound`, never a
    /// new assignment.
    pub fn update_fire_station(&self, fire_station: &FireStation) -> StoreResult<FireStation> {
        self.fire_stations.update(fire_station, self.sync())
    }

    pub fn delete_fire_station(&self, address: &str) -> StoreResult<FireStation> {
        self.fire_stations.delete(address, self.sync())
    }
}
