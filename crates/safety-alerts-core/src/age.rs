//! Age derivation from medical-record birthdates.
//!
//! Ages are never stored. They are recomputed from the `MM/DD/YYYY`
//! birthdate every time a view needs one.

use chrono::{Datelike, Local, NaiveDate};
use thiserror::Error;

/// Sentinel age for a blank birthdate or a resident without a medical record.
pub const UNKNOWN_AGE: i32 = -1;

/// Oldest age still classified as a child.
pub const CHILD_AGE_LIMIT: i32 = 18;

/// Birthdate layout used by the alerts document.
pub const BIRTHDATE_FORMAT: &str = "%m/%d/%Y";

/// Age calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgeError {
    #[error("Invalid birthdate '{value}': {reason}")]
    InvalidBirthdate { value: String, reason: String },
}

pub type AgeResult<T> = Result<T, AgeError>;

/// Whole years between `birthdate` and the local calendar date.
///
/// Blank input yields [`UNKNOWN_AGE`]. Anything else that does not parse
/// as `MM/DD/YYYY` is an error.
pub fn calculate_age(birthdate: &str) -> AgeResult<i32> {
    calculate_age_on(birthdate, Local::now().date_naive())
}

/// Same as [`calculate_age`], measured against an explicit `today`.
pub fn calculate_age_on(birthdate: &str, today: NaiveDate) -> AgeResult<i32> {
    if birthdate.trim().is_empty() {
        return Ok(UNKNOWN_AGE);
    }

    let born = NaiveDate::parse_from_str(birthdate, BIRTHDATE_FORMAT).map_err(|e| {
        AgeError::InvalidBirthdate {
            value: birthdate.to_string(),
            reason: e.to_string(),
        }
    })?;

    Ok(years_between(born, today))
}

/// Calendar-aware year difference; the current year counts only once the
/// birthday has been reached.
fn years_between(born: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    years
}

/// Known age between 0 and [`CHILD_AGE_LIMIT`] inclusive.
pub fn is_child(age: i32) -> bool {
    (0..=CHILD_AGE_LIMIT).contains(&age)
}

pub fn is_adult(age: i32) -> bool {
    age > CHILD_AGE_LIMIT
}
