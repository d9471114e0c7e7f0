//! CLI argument parsing with clap derive.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tariff_engine::{DayClass, DEFAULT_BASE_IRI};

/// Parse free-text carpark tariffs into canonical rate records
#[derive(Parser, Debug)]
#[command(name = "tariff")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Clean a CSV tariff table into JSON lines
    Clean(IoArgs),
    /// Export cleaned JSON lines as N-Triples
    Triples(TriplesArgs),
    /// Answer questions over cleaned JSON lines
    #[command(subcommand)]
    Query(QueryCommand),
}

#[derive(Args, Debug)]
pub struct IoArgs {
    /// Input file (stdin when absent)
    #[arg(short, long, env = "TARIFF_INPUT", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Output file (stdout when absent)
    #[arg(short, long, env = "TARIFF_OUTPUT", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TriplesArgs {
    #[command(flatten)]
    pub io: IoArgs,

    /// Namespace for every generated IRI
    #[arg(long, env = "TARIFF_BASE_IRI", default_value = DEFAULT_BASE_IRI, value_name = "IRI")]
    pub base_iri: String,
}

#[derive(Subcommand, Debug)]
pub enum QueryCommand {
    /// The category with the most carparks
    MostCarparks(InputArgs),
    /// Highest per-minute rate per category at a given day and time
    MaxRate(MaxRateArgs),
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Cleaned JSON lines (stdin when absent)
    #[arg(short, long, env = "TARIFF_INPUT", value_name = "PATH")]
    pub input: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MaxRateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Day class: weekday, saturday or sunday
    #[arg(long, value_parser = parse_day)]
    pub day: DayClass,

    /// Time of day as HH:MM
    #[arg(long, value_name = "HH:MM")]
    pub at: String,
}

fn parse_day(s: &str) -> Result<DayClass, String> {
    s.parse().map_err(|e: tariff_engine::TariffError| e.to_string())
}
