//! Layout of the on-disk alerts document.
//!
//! ```json
//! { "persons": [...], "firestations": [...], "medicalrecords": [...] }
//! ```

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{SyncError, SyncResult};
use crate::models::{FireStation, MedicalRecord, Person};

/// One top-level array of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Persons,
    FireStations,
    MedicalRecords,
}

impl Section {
    /// JSON key of the array.
    pub fn key(&self) -> &'static str {
        match self {
            Section::Persons => "persons",
            Section::FireStations => "firestations",
            Section::MedicalRecords => "medicalrecords",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Fully typed view of the document, used for bulk loading.
///
/// Missing arrays load as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlertsDocument {
    pub persons: Vec<Person>,
    pub firestations: Vec<FireStation>,
    pub medicalrecords: Vec<MedicalRecord>,
}

impl AlertsDocument {
    pub fn parse(path: &Path, bytes: &[u8]) -> SyncResult<Self> {
        // Going through the raw root reports a non-object root the same way
        // the write path does.
        let root = RawDocument::parse(path, bytes)?;
        serde_json::from_value(Value::Object(root.fields)).map_err(|e| SyncError::MalformedDocument {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Untyped root object. Sections other than the one being rewritten pass
/// through exactly as read.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawDocument {
    pub(crate) fields: Map<String, Value>,
}

impl RawDocument {
    pub(crate) fn parse(path: &Path, bytes: &[u8]) -> SyncResult<Self> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| SyncError::MalformedDocument {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(SyncError::MalformedDocument {
                path: path.to_path_buf(),
                reason: format!("expected a JSON object at the root, found {}", json_kind(&other)),
            }),
        }
    }

    /// Decode one section. A missing or `null` section is empty.
    pub(crate) fn section<T: DeserializeOwned>(&self, path: &Path, section: Section) -> SyncResult<Vec<T>> {
        match self.fields.get(section.key()) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(|e| SyncError::MalformedDocument {
                    path: path.to_path_buf(),
                    reason: format!("section '{}': {}", section, e),
                })
            }
        }
    }

    /// Replace one section with `records`, leaving the others untouched.
    pub(crate) fn replace_section<T: Serialize>(&mut self, section: Section, records: &[T]) -> SyncResult<()> {
        let value = serde_json::to_value(records)?;
        self.fields.insert(section.key().to_string(), value);
        Ok(())
    }

    pub(crate) fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
