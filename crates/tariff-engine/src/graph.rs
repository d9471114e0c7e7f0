//! Knowledge-graph export.
//!
//! Maps canonical records onto a small carpark vocabulary and renders the
//! result as N-Triples. Every IRI is `<base><local name>`; the base defaults
//! to [`DEFAULT_BASE_IRI`].
//!
//! Nodes:
//!
//! - `Carpark` per record, `LocationCategory` per category
//! - `CarparkCharge` per filled slot, named `<carpark>_<slot key>`
//! - one node per charge type (`PricePerEntry`, `PricePerUnitTime`,
//!   `DailyPricePerUnitTime`)
//!
//! Daily charges get an explicit `00:00`–`23.59` window so every charge node
//! carries a start and end time where one applies.

use std::fmt;
use std::io::Write;

use crate::error::Result;
use crate::model::{
    CanonicalCharge, DayClass, FacilityRateRecord, RateTerm, Slot, END_OF_DAY, START_OF_DAY,
};

pub const DEFAULT_BASE_IRI: &str = "http://cdit#";

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const XSD_FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";

// ── Terms ───────────────────────────────────────────────────────────────────

/// The object of a triple.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Iri(String),
    Literal(String),
    Float(f64),
}

/// One `subject predicate object` statement. Subject and predicate are IRIs.
#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Term,
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> <{}> ", self.subject, self.predicate)?;
        match &self.object {
            Term::Iri(iri) => write!(f, "<{iri}>")?,
            Term::Literal(text) => write!(f, "\"{}\"", escape_literal(text))?,
            Term::Float(value) => write!(f, "\"{value:?}\"^^<{XSD_FLOAT}>")?,
        }
        write!(f, " .")
    }
}

/// Escape a string for use inside an N-Triples `"..."` literal.
fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

// ── Vocabulary ──────────────────────────────────────────────────────────────

/// Builds IRIs under one namespace.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    base: String,
}

impl Vocabulary {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// The IRI for a local name. Whitespace is dropped and characters
    /// N-Triples forbids inside `<...>` are percent-encoded.
    pub fn iri(&self, local: &str) -> String {
        let mut iri = String::with_capacity(self.base.len() + local.len());
        iri.push_str(&self.base);
        for c in local.chars().filter(|c| !c.is_whitespace()) {
            match c {
                '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => {
                    iri.push_str(&format!("%{:02X}", c as u32));
                }
                c if c.is_control() => {
                    iri.push_str(&format!("%{:02X}", c as u32));
                }
                c => iri.push(c),
            }
        }
        iri
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_IRI)
    }
}

// ── Mapping ─────────────────────────────────────────────────────────────────

/// Every triple describing one record.
///
/// # Examples
///
/// ```
/// use tariff_engine::graph::{record_triples, Vocabulary};
/// use tariff_engine::model::FacilityRateRecord;
///
/// let triples = record_triples(
///     &FacilityRateRecord::empty("ACE Building", "Others"),
///     &Vocabulary::default(),
/// );
/// assert_eq!(
///     triples[0].to_string(),
///     "<http://cdit#ACEBuilding> \
///      <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://cdit#Carpark> ."
/// );
/// ```
pub fn record_triples(record: &FacilityRateRecord, vocab: &Vocabulary) -> Vec<Triple> {
    let mut out = Vec::new();
    let carpark = vocab.iri(&record.name);
    let category = vocab.iri(&record.category);

    push_iri(&mut out, &carpark, RDF_TYPE, vocab.iri("Carpark"));
    push_literal(&mut out, &carpark, &vocab.iri("name"), &record.name);
    push_iri(&mut out, &category, RDF_TYPE, vocab.iri("LocationCategory"));
    push_literal(&mut out, &category, &vocab.iri("name"), &record.category);
    push_iri(&mut out, &carpark, &vocab.iri("hasLocationCategory"), category.clone());
    push_iri(&mut out, &category, &vocab.iri("isInLocationCategory"), carpark.clone());

    for (slot, charge) in record.charges() {
        charge_triples(&mut out, vocab, &record.name, &carpark, slot, charge);
    }
    out
}

fn charge_triples(
    out: &mut Vec<Triple>,
    vocab: &Vocabulary,
    name: &str,
    carpark: &str,
    slot: Slot,
    charge: &CanonicalCharge,
) {
    let node = vocab.iri(&format!("{name}_{}", slot.json_key()));
    let kind = charge.kind();
    let kind_node = vocab.iri(kind.type_name());

    push_iri(out, &node, RDF_TYPE, vocab.iri("CarparkCharge"));
    push_iri(out, &kind_node, RDF_TYPE, vocab.iri("CarparkChargeType"));
    push_iri(out, &node, &vocab.iri("hasCarparkChargeType"), kind_node.clone());
    push_iri(out, &kind_node, &vocab.iri("isChargedByCarpark"), node.clone());

    let (day_link, day_inverse) = match slot.day() {
        DayClass::Weekday => ("hasWeekdayCarparkCharges", "isChargedByCarparkOnWeekday"),
        DayClass::Saturday => ("hasSaturdayCarparkCharges", "isChargedByCarparkOnSaturday"),
        DayClass::SundayHoliday => ("hasSundayCarparkCharges", "isChargedByCarparkOnSunday"),
    };
    push_iri(out, carpark, &vocab.iri(day_link), node.clone());
    push_iri(out, &node, &vocab.iri(day_inverse), carpark.to_string());

    let (start, end) = match charge.window {
        Some(window) => (window.start, window.end),
        None => (START_OF_DAY, Some(END_OF_DAY)),
    };
    push_float(out, &node, &vocab.iri("startTime"), start);
    if let Some(end) = end {
        push_float(out, &node, &vocab.iri("endTime"), end);
    }

    let term = &charge.term;
    push_float(out, &node, &vocab.iri("baseRate"), term.base_rate());
    if let Some(unit) = term.base_unit_minutes() {
        push_float(out, &node, &vocab.iri("baseRateTimeUnitInMins"), unit);
    }
    if let RateTerm::TieredPerUnitTime {
        subsequent_rate,
        subsequent_unit_minutes,
        ..
    } = *term
    {
        push_float(out, &node, &vocab.iri("subsequentRate"), subsequent_rate);
        push_float(
            out,
            &node,
            &vocab.iri("subsequentRateTimeUnitInMins"),
            subsequent_unit_minutes,
        );
    }
}

fn push_iri(out: &mut Vec<Triple>, subject: &str, predicate: &str, object: String) {
    out.push(Triple {
        subject: subject.to_string(),
        predicate: predicate.to_string(),
        object: Term::Iri(object),
    });
}

fn push_literal(out: &mut Vec<Triple>, subject: &str, predicate: &str, text: &str) {
    out.push(Triple {
        subject: subject.to_string(),
        predicate: predicate.to_string(),
        object: Term::Literal(text.to_string()),
    });
}

fn push_float(out: &mut Vec<Triple>, subject: &str, predicate: &str, value: f64) {
    out.push(Triple {
        subject: subject.to_string(),
        predicate: predicate.to_string(),
        object: Term::Float(value),
    });
}

/// Write the triples of every record, one N-Triples statement per line.
/// Returns the number of statements written.
pub fn write_triples<'a, W, I>(mut writer: W, records: I, vocab: &Vocabulary) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a FacilityRateRecord>,
{
    let mut written = 0;
    for record in records {
        for triple in record_triples(record, vocab) {
            writeln!(writer, "{triple}")?;
            written += 1;
        }
    }
    writer.flush()?;
    Ok(written)
}

// ── Tests ───────────────────────────────────────────────────────────────────
