//! Station-based views: phone alert, flood and station coverage.

use super::{AlertQueries, QueryResult};
use crate::age::{is_adult, is_child};
use crate::models::{CoveredResident, FloodResident, Person, PhoneAlert, StationCoverage};

impl<'a> AlertQueries<'a> {
    /// Persons living at an address in `covered` (lowercased).
    fn persons_covered_by<S: AsRef<str>>(&self, stations: &[S]) -> QueryResult<Vec<Person>> {
        let covered = self.covered_addresses(stations)?;
        if covered.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .store
            .list_persons()?
            .into_iter()
            .filter(|p| covered.contains(&p.address.to_lowercase()))
            .collect())
    }

    /// Phone number of every resident covered by `station`.
    ///
    /// Not de-duplicated: a shared landline repeats once per resident.
    pub fn phones_by_station(&self, station: &str) -> QueryResult<Vec<PhoneAlert>> {
        let phones: Vec<PhoneAlert> = self
            .persons_covered_by(&[station])?
            .into_iter()
            .map(|p| PhoneAlert { phone: p.phone })
            .collect();

        tracing::debug!(station, count = phones.len(), "Phone alert computed");
        Ok(phones)
    }

    /// Residents covered by any of `stations`, with medical details.
    pub fn residents_by_stations<S: AsRef<str>>(&self, stations: &[S]) -> QueryResult<Vec<FloodResident>> {
        let persons = self.persons_covered_by(stations)?;
        if persons.is_empty() {
            return Ok(Vec::new());
        }

        let medical = self.medical_index()?;
        persons
            .into_iter()
            .map(|person| -> QueryResult<FloodResident> {
                let summary = medical.summary(&person, self.today)?;
                Ok(FloodResident {
                    first_name: person.first_name,
                    last_name: person.last_name,
                    phone: person.phone,
                    age: summary.age,
                    medications: summary.medications,
                    allergies: summary.allergies,
                })
            })
            .collect()
    }

    /// Everyone covered by `station` plus adult and child counts.
    pub fn station_coverage(&self, station: &str) -> QueryResult<StationCoverage> {
        let persons = self.persons_covered_by(&[station])?;
        if persons.is_empty() {
            return Ok(StationCoverage::default());
        }

        let medical = self.medical_index()?;
        let mut coverage = StationCoverage::default();
        for person in persons {
            let summary = medical.summary(&person, self.today)?;
            if is_adult(summary.age) {
                coverage.adult_count += 1;
            } else if is_child(summary.age) {
                coverage.child_count += 1;
            }

            coverage.residents.push(CoveredResident {
                first_name: person.first_name,
                last_name: person.last_name,
                address: person.address,
                phone: person.phone,
                age: summary.age,
                station: station.to_string(),
                medications: summary.medications,
                allergies: summary.allergies,
            });
        }

        tracing::debug!(
            station,
            residents = coverage.residents.len(),
            adults = coverage.adult_count,
            children = coverage.child_count,
            "Station coverage computed"
        );
        Ok(coverage)
    }
}
