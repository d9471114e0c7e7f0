//! tariff CLI entry point.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use tariff_engine::{
    category_with_most_carparks, max_rate_per_category, parse_clock_time, read_records,
    write_triples, FacilityRateRecord, Vocabulary,
};

mod cli;

use cli::{Cli, Command, InputArgs, IoArgs, MaxRateArgs, QueryCommand, TriplesArgs};

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tariff: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Clean(args) => cmd_clean(&args),
        Command::Triples(args) => cmd_triples(&args),
        Command::Query(QueryCommand::MostCarparks(args)) => cmd_most_carparks(&args),
        Command::Query(QueryCommand::MaxRate(args)) => cmd_max_rate(&args),
    }
}

// ── Commands ────────────────────────────────────────────────────────────────

fn cmd_clean(args: &IoArgs) -> Result<()> {
    let input = open_input(args.input.as_deref())?;
    let output = open_output(args.output.as_deref())?;
    let summary = tariff_engine::clean(input, output).context("failed to clean tariff table")?;
    info!(
        rows = summary.rows,
        records_with_charges = summary.priced,
        unparsed_fields = summary.unparsed_fields,
        "clean finished"
    );
    Ok(())
}

fn cmd_triples(args: &TriplesArgs) -> Result<()> {
    let records = load_records(args.io.input.as_deref())?;
    let output = open_output(args.io.output.as_deref())?;
    let vocab = Vocabulary::new(args.base_iri.as_str());
    let written =
        write_triples(output, &records, &vocab).context("failed to write triples")?;
    info!(records = records.len(), triples = written, "triples exported");
    Ok(())
}

fn cmd_most_carparks(args: &InputArgs) -> Result<()> {
    let records = load_records(args.input.as_deref())?;
    let answer = category_with_most_carparks(&records);
    println!("{}", serde_json::to_string(&answer)?);
    Ok(())
}

fn cmd_max_rate(args: &MaxRateArgs) -> Result<()> {
    let at = parse_clock_time(&args.at)?;
    let records = load_records(args.input.input.as_deref())?;
    let maxima = max_rate_per_category(&records, args.day, at);
    println!("{}", serde_json::to_string(&maxima)?);
    Ok(())
}

// ── I/O helpers ─────────────────────────────────────────────────────────────

fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn load_records(path: Option<&Path>) -> Result<Vec<FacilityRateRecord>> {
    let input = open_input(path)?;
    read_records(input).context("failed to read cleaned records")
}
