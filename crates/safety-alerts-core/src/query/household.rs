//! Address-based views: child alert and fire.

use super::{AlertQueries, QueryResult};
use crate::age::is_child;
use crate::models::{ChildAlert, FireResident, Person};

impl<'a> AlertQueries<'a> {
    /// Children (known age 0-18) living at `address`, each listed with the
    /// whole household.
    ///
    /// Residents without a medical record have unknown age and are never
    /// reported as children, though they still appear as family members.
    pub fn children_at_address(&self, address: &str) -> QueryResult<Vec<ChildAlert>> {
        let household: Vec<Person> = self
            .store
            .list_persons()?
            .into_iter()
            .filter(|p| p.lives_at(address))
            .collect();

        if household.is_empty() {
            return Ok(Vec::new());
        }

        let medical = self.medical_index()?;
        let mut alerts = Vec::new();
        for person in &household {
            let age = medical.age_of(person, self.today)?;
            if is_child(age) {
                alerts.push(ChildAlert {
                    first_name: person.first_name.clone(),
                    last_name: person.last_name.clone(),
                    age,
                    family_members: household.clone(),
                });
            }
        }

        tracing::debug!(address, count = alerts.len(), "Child alert computed");
        Ok(alerts)
    }

    /// Everyone living at `address` with the station covering it and their
    /// medical details.
    pub fn residents_at_address(&self, address: &str) -> QueryResult<Vec<FireResident>> {
        let residents: Vec<Person> = self
            .store
            .list_persons()?
            .into_iter()
            .filter(|p| p.lives_at(address))
            .collect();

        if residents.is_empty() {
            return Ok(Vec::new());
        }

        let station = self.store.find_fire_station(address)?.map(|fs| fs.station);
        if station.is_none() {
            tracing::warn!(address, "No fire station assigned for address");
        }

        let medical = self.medical_index()?;
        residents
            .iter()
            .map(|person| -> QueryResult<FireResident> {
                let summary = medical.summary(person, self.today)?;
                Ok(FireResident {
                    first_name: person.first_name.clone(),
                    last_name: person.last_name.clone(),
                    phone: person.phone.clone(),
                    age: summary.age,
                    station: station.clone(),
                    medications: summary.medications,
                    allergies: summary.allergies,
                })
            })
            .collect()
    }
}
