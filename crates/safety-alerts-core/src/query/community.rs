//! Name- and city-based views: person info and community email.

use std::collections::HashSet;

use super::{AlertQueries, QueryResult};
use crate::models::{eq_ignore_case, CommunityEmail, PersonInfo};

impl<'a> AlertQueries<'a> {
    /// Everyone with exactly this last name (case-sensitive), with address,
    /// email and medical details.
    pub fn person_info_by_last_name(&self, last_name: &str) -> QueryResult<Vec<PersonInfo>> {
        let matches: Vec<_> = self
            .store
            .list_persons()?
            .into_iter()
            .filter(|p| p.last_name == last_name)
            .collect();

        if matches.is_empty() {
            return Ok(Vec::new());
        }

        let medical = self.medical_index()?;
        matches
            .into_iter()
            .map(|person| -> QueryResult<PersonInfo> {
                let summary = medical.summary(&person, self.today)?;
                Ok(PersonInfo {
                    first_name: person.first_name,
                    last_name: person.last_name,
                    address: person.address,
                    age: summary.age,
                    email: person.email,
                    medications: summary.medications,
                    allergies: summary.allergies,
                })
            })
            .collect()
    }

    /// Distinct emails of residents of `city` (case-insensitive), in first
    /// seen order.
    pub fn emails_by_city(&self, city: &str) -> QueryResult<Vec<CommunityEmail>> {
        let mut seen = HashSet::new();
        let emails: Vec<CommunityEmail> = self
            .store
            .list_persons()?
            .into_iter()
            .filter(|p| eq_ignore_case(&p.city, city))
            .filter(|p| seen.insert(p.email.clone()))
            .map(|p| CommunityEmail { email: p.email })
            .collect();

        tracing::debug!(city, count = emails.len(), "Community email computed");
        Ok(emails)
    }
}
