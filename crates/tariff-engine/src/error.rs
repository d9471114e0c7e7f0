//! Error types for tariff-engine operations.
//!
//! The parser itself never fails (unrecognized text degrades to an empty
//! slot). These errors belong to the I/O edges: reading the source table,
//! decoding cleaned records, and interpreting caller-supplied arguments.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TariffError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    #[error("Invalid day class: {0}")]
    InvalidDay(String),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),
}

pub type Result<T> = std::result::Result<T, TariffError>;
