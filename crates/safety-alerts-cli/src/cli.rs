use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "safety-alerts")]
#[command(about = "Safety Alerts CLI - emergency dispatch lookups over an alerts document")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the alerts JSON document
    #[arg(short, long, global = true, env = "SAFETY_ALERTS_DATA", default_value = "data.json")]
    pub data: PathBuf,

    /// Log filter directives (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_filter: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Children living at an address, with their household
    ChildAlert(AddressArgs),
    /// Phone numbers of residents covered by a station
    PhoneAlert(PhoneAlertArgs),
    /// Residents at an address with their station and medical details
    Fire(AddressArgs),
    /// Residents covered by any of several stations
    Flood(FloodArgs),
    /// Residents with a given last name (case-sensitive)
    PersonInfo(PersonInfoArgs),
    /// Distinct emails of a city's residents
    CommunityEmail(CommunityEmailArgs),
    /// Station coverage with adult and child counts
    Station(StationArgs),
    /// Dump one collection
    List(ListArgs),
}

#[derive(clap::Args)]
pub struct AddressArgs {
    /// Street address (case-insensitive)
    #[arg(long, value_parser = non_blank)]
    pub address: String,
}

#[derive(clap::Args)]
pub struct PhoneAlertArgs {
    /// Station number
    #[arg(long, value_parser = non_blank)]
    pub station: String,
}

#[derive(clap::Args)]
pub struct FloodArgs {
    /// Comma-separated station numbers (e.g. 1,2)
    #[arg(long, required = true, value_delimiter = ',', value_parser = non_blank)]
    pub stations: Vec<String>,
}

#[derive(clap::Args)]
pub struct PersonInfoArgs {
    #[arg(long, value_parser = non_blank)]
    pub last_name: String,
}

#[derive(clap::Args)]
pub struct CommunityEmailArgs {
    /// City (case-insensitive)
    #[arg(long, value_parser = non_blank)]
    pub city: String,
}

#[derive(clap::Args)]
pub struct StationArgs {
    /// Station number
    #[arg(long, value_parser = non_blank)]
    pub number: String,
}

#[derive(clap::Args)]
pub struct ListArgs {
    pub collection: Collection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Collection {
    Persons,
    Firestations,
    Medicalrecords,
}

fn non_blank(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("value must not be blank".to_string());
    }
    Ok(value.to_string())
}
