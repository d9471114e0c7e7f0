//! # tariff-engine
//!
//! Deterministic parsing of free-text carpark tariffs.
//!
//! Tariff tables describe rates in prose: `"7am-7pm: $1.20 per 30 mins"`,
//! `"Aft 6pm: $2 per entry"`, `"Same as Saturday"`. This crate turns each
//! row into a [`FacilityRateRecord`] with up to six canonical charges, or
//! leaves a slot empty when the text has no recognised shape.
//!
//! ## Modules
//!
//! - [`normalize`] — unit and glyph normalization (`½ hr` → `30mins`, `Free` → `$0`)
//! - [`window`] — time part → [`TimeWindow`]
//! - [`rate`] — charge part → [`RateTerm`] (flat, tiered, per entry)
//! - [`classify`] — ordered rule table picking the shape of a field
//! - [`assemble`] — cross-field rules and carry-over between day classes
//! - [`source`] — CSV tariff table reader and the cleaning pipeline
//! - [`wire`] — JSON-lines encoding of records
//! - [`graph`] — N-Triples knowledge-graph export
//! - [`query`] — category counts and per-minute rate maxima
//! - [`model`] — canonical record types
//! - [`error`] — Error types

pub mod assemble;
pub mod classify;
pub mod error;
pub mod graph;
pub mod model;
pub mod normalize;
pub mod query;
pub mod rate;
pub mod source;
pub mod window;
pub mod wire;

pub use assemble::{assemble, assemble_with_report, Assembled, RawTariffFields};
pub use classify::{classify, has_monetary_signal, TariffField, TariffRule, RULES};
pub use error::TariffError;
pub use graph::{record_triples, write_triples, Term, Triple, Vocabulary, DEFAULT_BASE_IRI};
pub use model::{
    CanonicalCharge, ChargeKind, DayClass, FacilityRateRecord, RateTerm, SharedCharge, Slot,
    TimeWindow, END_OF_DAY, START_OF_DAY,
};
pub use normalize::normalize;
pub use query::{
    category_with_most_carparks, max_rate_per_category, parse_clock_time, CategoryCount,
    CategoryMaximum,
};
pub use rate::{extract_flat_rate, extract_per_entry, extract_tiered_rate};
pub use source::{assemble_rows, clean, read_rows, CleanSummary, TariffRow};
pub use window::extract_window;
pub use wire::{read_records, write_records};
