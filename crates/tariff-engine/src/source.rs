//! CSV source rows.
//!
//! The input table has a header row naming at least these columns:
//! `carpark`, `category`, `weekdays_rate_1`, `weekdays_rate_2`,
//! `saturday_rate`, `sunday_publicholiday_rate`. Other columns are ignored.

use std::io::{Read, Write};

use serde::Deserialize;
use tracing::{info, warn};

use crate::assemble::{assemble_with_report, RawTariffFields};
use crate::error::Result;
use crate::model::FacilityRateRecord;
use crate::wire::write_records;

/// One row of the tariff table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TariffRow {
    pub carpark: String,
    pub category: String,
    #[serde(default)]
    pub weekdays_rate_1: String,
    #[serde(default)]
    pub weekdays_rate_2: String,
    #[serde(default)]
    pub saturday_rate: String,
    #[serde(default)]
    pub sunday_publicholiday_rate: String,
}

impl TariffRow {
    /// Borrow the row as assembler input.
    ///
    /// A single trailing `.` on the weekday fields is dropped; the source
    /// table ends some sentences with one (`"... per entry."`).
    pub fn fields(&self) -> RawTariffFields<'_> {
        RawTariffFields {
            name: &self.carpark,
            category: &self.category,
            weekday_1: trim_trailing_period(&self.weekdays_rate_1),
            weekday_2: trim_trailing_period(&self.weekdays_rate_2),
            saturday: &self.saturday_rate,
            sunday_holiday: &self.sunday_publicholiday_rate,
        }
    }
}

fn trim_trailing_period(field: &str) -> &str {
    field.strip_suffix('.').unwrap_or(field)
}

/// Read every row of a tariff table.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<TariffRow>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();
    for row in csv.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Counts from one cleaning run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CleanSummary {
    /// Rows read from the table.
    pub rows: usize,
    /// Records with at least one charge.
    pub priced: usize,
    /// Fields that carried money but matched no rule.
    pub unparsed_fields: usize,
}

/// Assemble one record per row, counting what went unparsed.
pub fn assemble_rows(rows: &[TariffRow]) -> (Vec<FacilityRateRecord>, CleanSummary) {
    let mut summary = CleanSummary {
        rows: rows.len(),
        ..Default::default()
    };
    let records = rows
        .iter()
        .map(|row| {
            let assembled = assemble_with_report(&row.fields());
            summary.unparsed_fields += assembled.unparsed.len();
            if assembled.record.has_charges() {
                summary.priced += 1;
            }
            assembled.record
        })
        .collect();
    (records, summary)
}

/// Read a tariff table and write its canonical records as JSON lines.
pub fn clean<R: Read, W: Write>(input: R, output: W) -> Result<CleanSummary> {
    let rows = read_rows(input)?;
    let (records, summary) = assemble_rows(&rows);
    write_records(output, &records)?;

    if summary.unparsed_fields > 0 {
        warn!(
            unparsed = summary.unparsed_fields,
            "some tariff fields could not be parsed"
        );
    }
    info!(
        rows = summary.rows,
        priced = summary.priced,
        "cleaned tariff table"
    );
    Ok(summary)
}

// ── Tests ───────────────────────────────────────────────────────────────────
