//! Questions asked of a cleaned record set.
//!
//! Times are clock values in the same decimal-hour notation the records use
//! (`18:30` → `18.30`). Rates compare per minute: `baseRate / unit`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveTime, Timelike};
use serde::Serialize;

use crate::error::{Result, TariffError};
use crate::model::{DayClass, FacilityRateRecord};

/// Rates within this distance count as equal.
const RATE_EPSILON: f64 = 1e-9;

/// A category and how many facilities sit in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub carparks: usize,
}

/// The highest per-minute rate in one category at a given time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMaximum {
    pub category: String,
    /// Dollars per minute.
    pub max_rate: f64,
    /// Every facility charging `max_rate`, in input order.
    pub carparks: Vec<String>,
}

/// The category holding the most facilities.
///
/// Facilities are counted once per distinct name. Ties go to the
/// alphabetically first category. `None` for an empty set.
pub fn category_with_most_carparks(records: &[FacilityRateRecord]) -> Option<CategoryCount> {
    let mut members: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for record in records {
        members
            .entry(record.category.as_str())
            .or_default()
            .insert(record.name.as_str());
    }

    let mut best: Option<(&str, usize)> = None;
    for (category, names) in members {
        let count = names.len();
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((category, count));
        }
    }
    best.map(|(category, carparks)| CategoryCount {
        category: category.to_string(),
        carparks,
    })
}

/// Per category, the highest per-minute rate any facility charges on `day`
/// at clock value `at`, and which facilities charge it.
///
/// Only time-based charges whose window contains `at` take part; per-entry
/// charges have no per-minute rate. Categories with no such charge are
/// left out. Results are sorted by category.
///
/// # Examples
///
/// ```
/// use tariff_engine::assemble::{assemble, RawTariffFields};
/// use tariff_engine::model::DayClass;
/// use tariff_engine::query::max_rate_per_category;
///
/// let record = assemble(&RawTariffFields {
///     name: "Bugis Junction",
///     category: "Others",
///     weekday_1: "7am-7pm: $1.20 per 30 mins",
///     ..Default::default()
/// });
/// let maxima = max_rate_per_category(&[record], DayClass::Weekday, 18.0);
/// assert_eq!(maxima[0].carparks, vec!["Bugis Junction"]);
/// assert!((maxima[0].max_rate - 0.04).abs() < 1e-9);
/// ```
pub fn max_rate_per_category(
    records: &[FacilityRateRecord],
    day: DayClass,
    at: f64,
) -> Vec<CategoryMaximum> {
    let mut maxima: BTreeMap<&str, (f64, Vec<&str>)> = BTreeMap::new();

    for record in records {
        let Some(rate) = highest_rate_at(record, day, at) else {
            continue;
        };
        let entry = maxima
            .entry(record.category.as_str())
            .or_insert((rate, Vec::new()));
        if rate > entry.0 + RATE_EPSILON {
            *entry = (rate, vec![record.name.as_str()]);
        } else if (rate - entry.0).abs() <= RATE_EPSILON && !entry.1.contains(&record.name.as_str())
        {
            entry.1.push(record.name.as_str());
        }
    }

    maxima
        .into_iter()
        .map(|(category, (max_rate, carparks))| CategoryMaximum {
            category: category.to_string(),
            max_rate,
            carparks: carparks.into_iter().map(str::to_string).collect(),
        })
        .collect()
}

/// The facility's highest per-minute rate among charges applying at `at`.
fn highest_rate_at(record: &FacilityRateRecord, day: DayClass, at: f64) -> Option<f64> {
    day.slots()
        .into_iter()
        .filter_map(|slot| record.charge(slot))
        .filter(|charge| charge.applies_at(at))
        .filter_map(|charge| charge.term.rate_per_minute())
        .map(f64::abs)
        .fold(None, |best, rate| Some(best.map_or(rate, |b: f64| b.max(rate))))
}

/// Parse `HH:MM` (or a bare hour) into a clock value: `"18:30"` → `18.30`.
pub fn parse_clock_time(text: &str) -> Result<f64> {
    let text = text.trim();
    let time = NaiveTime::parse_from_str(text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(&format!("{text}:00"), "%H:%M"))
        .map_err(|_| TariffError::InvalidTime(text.to_string()))?;
    Ok(f64::from(time.hour()) + f64::from(time.minute()) / 100.0)
}

// ── Tests ───────────────────────────────────────────────────────────────────
