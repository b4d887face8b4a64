//! Subcommand dispatch onto the core query engine.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use safety_alerts_core::{AlertQueries, EntityStore};

use crate::cli::{Collection, Commands};

/// Run one subcommand against `store` and return its JSON output.
pub fn execute(store: &EntityStore, command: &Commands) -> Result<Value> {
    let queries = AlertQueries::new(store);

    match command {
        Commands::ChildAlert(args) => to_json(&queries.children_at_address(&args.address)?),
        Commands::PhoneAlert(args) => to_json(&queries.phones_by_station(&args.station)?),
        Commands::Fire(args) => to_json(&queries.residents_at_address(&args.address)?),
        Commands::Flood(args) => to_json(&queries.residents_by_stations(&args.stations)?),
        Commands::PersonInfo(args) => to_json(&queries.person_info_by_last_name(&args.last_name)?),
        Commands::CommunityEmail(args) => to_json(&queries.emails_by_city(&args.city)?),
        Commands::Station(args) => to_json(&queries.station_coverage(&args.number)?),
        Commands::List(args) => match args.collection {
            Collection::Persons => to_json(&store.list_persons()?),
            Collection::Firestations => to_json(&store.list_fire_stations()?),
            Collection::Medicalrecords => to_json(&store.list_medical_records()?),
        },
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).context("Failed to serialize command output")
}
