//! Query engine integration tests against a bootstrapped document.

use std::fs;

use chrono::{Local, Months, NaiveDate};
use serde_json::json;

use safety_alerts_core::age::{BIRTHDATE_FORMAT, UNKNOWN_AGE};
use safety_alerts_core::models::Person;
use safety_alerts_core::query::AlertQueries;
use safety_alerts_core::store::EntityStore;

/// Birthdate of someone exactly `years` old today.
fn born_years_ago(years: u32) -> String {
    let today: NaiveDate = Local::now().date_naive();
    today
        .checked_sub_months(Months::new(years * 12))
        .unwrap()
        .format(BIRTHDATE_FORMAT)
        .to_string()
}

fn resident(first: &str, last: &str, address: &str, city: &str, phone: &str, email: &str) -> serde_json::Value {
    json!({
        "firstName": first, "lastName": last, "address": address, "city": city,
        "zip": "97451", "phone": phone, "email": email
    })
}

fn record(first: &str, last: &str, birthdate: &str, medications: &[&str]) -> serde_json::Value {
    json!({
        "firstName": first, "lastName": last, "birthdate": birthdate,
        "medications": medications, "allergies": []
    })
}

/// Household at "1 Elm St" (Ann 8, Bob 40, Cal without a record), a
/// neighbour with a blank birthdate and a second city.
fn setup() -> (tempfile::TempDir, EntityStore) {
    let document = json!({
        "persons": [
            resident("Ann", "Elm", "1 Elm St", "Culver", "555-0100", "elm@email.com"),
            resident("Bob", "Elm", "1 ELM ST", "Culver", "555-0100", "elm@email.com"),
            resident("Cal", "Elm", "1 elm st", "culver", "555-0101", "cal@email.com"),
            resident("Dee", "Oak", "2 Oak Ave", "CULVER", "555-0200", "dee@email.com"),
            resident("Eve", "Pine", "9 Pine Rd", "Springfield", "555-0900", "eve@email.com"),
        ],
        "firestations": [
            {"address": "1 Elm St", "station": "1"},
            {"address": "2 Oak Ave", "station": "2"},
        ],
        "medicalrecords": [
            record("Ann", "Elm", &born_years_ago(8), &["ibupurin:200mg"]),
            record("Bob", "Elm", &born_years_ago(40), &[]),
            record("Dee", "Oak", "", &["hydrapermazol:100mg"]),
            record("Eve", "Pine", &born_years_ago(70), &[]),
        ],
    });

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    fs::write(&path, serde_json::to_vec_pretty(&document).unwrap()).unwrap();
    let store = EntityStore::bootstrap(&path).unwrap();
    (dir, store)
}

#[test]
fn test_child_alert_join() {
    let (_dir, store) = setup();
    let alerts = AlertQueries::new(&store).children_at_address("1 Elm St").unwrap();

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].first_name, "Ann");
    assert_eq!(alerts[0].age, 8);

    let family: Vec<_> = alerts[0]
        .family_members
        .iter()
        .map(|p| p.first_name.as_str())
        .collect();
    assert_eq!(family, vec!["Ann", "Bob", "Cal"]);
}

#[test]
fn test_case_insensitive_address_for_station_queries() {
    let (_dir, store) = setup();
    let queries = AlertQueries::new(&store);

    let phones: Vec<_> = queries
        .phones_by_station("1")
        .unwrap()
        .into_iter()
        .map(|p| p.phone)
        .collect();
    assert_eq!(phones, vec!["555-0100", "555-0100", "555-0101"]);

    let fire = queries.residents_at_address("1 elm ST").unwrap();
    assert_eq!(fire.len(), 3);
    assert!(fire.iter().all(|r| r.station.as_deref() == Some("1")));

    let coverage = queries.station_coverage("1").unwrap();
    assert_eq!(coverage.residents.len(), 3);
}

#[test]
fn test_unknown_age_excluded_from_counts() {
    let (_dir, store) = setup();
    let queries = AlertQueries::new(&store);

    let one = queries.station_coverage("1").unwrap();
    assert_eq!(one.adult_count, 1);
    assert_eq!(one.child_count, 1);

    let two = queries.station_coverage("2").unwrap();
    assert_eq!(two.residents.len(), 1);
    assert_eq!(two.residents[0].age, UNKNOWN_AGE);
    assert_eq!(two.residents[0].medications, vec!["hydrapermazol:100mg".to_string()]);
    assert_eq!(two.adult_count, 0);
    assert_eq!(two.child_count, 0);

    assert!(queries.children_at_address("2 Oak Ave").unwrap().is_empty());
}

#[test]
fn test_flood_covers_union_without_station() {
    let (_dir, store) = setup();
    let residents = AlertQueries::new(&store)
        .residents_by_stations(&["2", "1"])
        .unwrap();

    let names: Vec<_> = residents.iter().map(|r| r.first_name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Bob", "Cal", "Dee"]);

    let value = serde_json::to_value(&residents[0]).unwrap();
    assert!(value.get("station").is_none());
    assert_eq!(value["firstName"], "Ann");
}

#[test]
fn test_fire_unassigned_address_has_no_station() {
    let (_dir, store) = setup();
    let fire = AlertQueries::new(&store)
        .residents_at_address("9 Pine Rd")
        .unwrap();

    assert_eq!(fire.len(), 1);
    assert_eq!(fire[0].station, None);
    assert_eq!(fire[0].age, 70);
    assert_eq!(serde_json::to_value(&fire[0]).unwrap()["station"], serde_json::Value::Null);
}

#[test]
fn test_email_deduplication() {
    let (_dir, store) = setup();
    let emails: Vec<_> = AlertQueries::new(&store)
        .emails_by_city("Culver")
        .unwrap()
        .into_iter()
        .map(|e| e.email)
        .collect();

    assert_eq!(emails, vec!["elm@email.com", "cal@email.com", "dee@email.com"]);
}

#[test]
fn test_person_info_by_last_name() {
    let (_dir, store) = setup();
    let queries = AlertQueries::new(&store);

    let info = queries.person_info_by_last_name("Elm").unwrap();
    assert_eq!(info.len(), 3);
    assert_eq!(info[0].medications, vec!["ibupurin:200mg".to_string()]);
    assert_eq!(info[2].age, UNKNOWN_AGE);

    assert!(queries.person_info_by_last_name("elm").unwrap().is_empty());
}

#[test]
fn test_views_follow_mutations() {
    let (_dir, store) = setup();

    let mut newcomer = Person::new("Fay", "Oak");
    newcomer.address = "2 oak ave".to_string();
    newcomer.city = "Culver".to_string();
    newcomer.phone = "555-0201".to_string();
    newcomer.email = "fay@email.com".to_string();
    assert!(store.insert_person(newcomer).unwrap());

    let queries = AlertQueries::new(&store);
    assert_eq!(queries.phones_by_station("2").unwrap().len(), 2);

    store.delete_fire_station("2 OAK AVE").unwrap();
    assert!(queries.phones_by_station("2").unwrap().is_empty());
    assert!(queries
        .residents_at_address("2 Oak Ave")
        .unwrap()
        .iter()
        .all(|r| r.station.is_none()));
}

#[test]
fn test_empty_results_for_unknown_inputs() {
    let (_dir, store) = setup();
    let queries = AlertQueries::new(&store);

    assert!(queries.children_at_address("nowhere").unwrap().is_empty());
    assert!(queries.phones_by_station("99").unwrap().is_empty());
    assert!(queries.residents_at_address("nowhere").unwrap().is_empty());
    assert!(queries.residents_by_stations(&["99"]).unwrap().is_empty());
    assert!(queries.person_info_by_last_name("Nobody").unwrap().is_empty());
    assert!(queries.emails_by_city("Atlantis").unwrap().is_empty());
    assert!(queries.station_coverage("99").unwrap().is_empty());
}
