//! Person store operations.

use super::{EntityStore, StoreResult};
use crate::models::{NameKey, Person};

impl EntityStore {
    /// Copy of every person.
    pub fn list_persons(&self) -> StoreResult<Vec<Person>> {
        self.persons.snapshot()
    }

    /// Get a person by name (case-insensitive).
    pub fn find_person(&self, first_name: &str, last_name: &str) -> StoreResult<Option<Person>> {
        self.persons.find(&NameKey::new(first_name, last_name))
    }

    /// Insert a new person and mirror it to the document.
    ///
    /// Callers that must reject duplicates check [`Self::find_person`] first.
    /// Returns `false` if the document already held this name.
    pub fn insert_person(&self, person: Person) -> StoreResult<bool> {
        self.persons.insert(person, self.sync())
    }

    /// Insert a person unless one with the same name is already in the
    /// store or the document.
    pub fn create_person(&self, person: Person) -> StoreResult<()> {
        self.persons.insert_unique(person, self.sync())
    }

    /// Update address and contact details of the person with the same name.
    pub fn update_person(&self, person: &Person) -> StoreResult<Person> {
        self.persons.update(person, self.sync())
    }

    /// Delete a person by name.
    pub fn delete_person(&self, first_name: &str, last_name: &str) -> StoreResult<Person> {
        self.persons
            .delete(&NameKey::new(first_name, last_name), self.sync())
    }
}
