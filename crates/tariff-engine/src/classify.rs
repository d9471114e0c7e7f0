//! Tariff classification.
//!
//! Decides which charge shape a raw tariff field has and builds the
//! [`CanonicalCharge`] for it. The decision order lives in [`RULES`]: an
//! ordered table of `(predicate, extractor)` pairs. The first rule whose
//! predicate matches owns the field; if its extractor fails the field is
//! unparsed and no later rule is tried.
//!
//! Fields with a `:` are read as `<time>: <charge>`, using the text before
//! the first colon and between the first and second:
//!
//! | rule            | time part                 | charge part              |
//! |-----------------|---------------------------|--------------------------|
//! | `daily`         | starts with `daily`       | flat or tiered           |
//! | `after-entry`   | starts with `aft`         | contains `per entry`     |
//! | `timed`         | `am` and `pm`, ≤ 15 chars | one `$`, or `sub` tiered |
//!
//! Fields without a `:` go through `all-day-entry`, `dashed` and
//! `all-day-tiered`, in that order.

use tracing::debug;

use crate::model::{CanonicalCharge, TimeWindow};
use crate::rate::{
    extract_entry_amount, extract_flat_rate, extract_per_entry, extract_tiered_rate,
    mentions_per_entry, standardize_separators,
};
use crate::window::{extract_window, has_both_meridiems, is_after, is_daily};

/// Longest time part treated as a time range. Longer text is descriptive
/// prose that happens to mention `am`/`pm`.
pub const MAX_TIME_PART_CHARS: usize = 15;

/// A raw tariff field, pre-split for the rule predicates.
#[derive(Debug, Clone, Copy)]
pub struct TariffField<'a> {
    pub raw: &'a str,
    /// Number of `:` delimiters in the field.
    pub colons: usize,
    /// `(time, charge)`: the first two `:`-separated parts, when there is a `:`.
    pub parts: Option<(&'a str, &'a str)>,
}

impl<'a> TariffField<'a> {
    pub fn new(raw: &'a str) -> Self {
        let colons = raw.matches(':').count();
        let mut split = raw.split(':');
        let parts = match (split.next(), split.next()) {
            (Some(time), Some(charge)) => Some((time, charge)),
            _ => None,
        };
        Self { raw, colons, parts }
    }

    fn time(&self) -> &'a str {
        self.parts.map_or("", |(time, _)| time)
    }

    fn charge(&self) -> &'a str {
        self.parts.map_or("", |(_, charge)| charge)
    }

    fn is_bare(&self) -> bool {
        self.colons == 0
    }
}

/// One entry of the decision table.
#[derive(Clone, Copy)]
pub struct TariffRule {
    pub name: &'static str,
    pub matches: fn(&TariffField<'_>) -> bool,
    pub extract: fn(&TariffField<'_>) -> Option<CanonicalCharge>,
}

/// The decision table, in priority order.
pub const RULES: &[TariffRule] = &[
    TariffRule {
        name: "daily",
        matches: |f| f.parts.is_some() && is_daily(f.time()),
        extract: extract_daily,
    },
    TariffRule {
        name: "after-entry",
        matches: |f| f.parts.is_some() && is_after(f.time()) && mentions_per_entry(f.charge()),
        extract: extract_after_entry,
    },
    TariffRule {
        name: "timed",
        matches: |f| {
            f.parts.is_some()
                && has_both_meridiems(f.time())
                && f.time().chars().count() <= MAX_TIME_PART_CHARS
        },
        extract: extract_timed,
    },
    TariffRule {
        name: "all-day-entry",
        matches: |f| {
            f.is_bare()
                && !f.raw.contains(" am ")
                && !f.raw.contains(" pm ")
                && f.raw.chars().count() > 2
                && mentions_per_entry(f.raw)
        },
        extract: extract_all_day_entry,
    },
    TariffRule {
        name: "dashed",
        matches: |f| f.is_bare() && f.raw.contains(" - "),
        extract: extract_dashed,
    },
    TariffRule {
        name: "all-day-tiered",
        matches: |f| f.is_bare() && f.raw.contains("sub"),
        extract: extract_all_day_tiered,
    },
];

/// Whether a field mentions money at all (`$` or `free`, any case).
///
/// Fields without a monetary signal are descriptions, not tariffs.
pub fn has_monetary_signal(raw: &str) -> bool {
    raw.contains('$') || raw.to_lowercase().contains("free")
}

/// Classify one raw tariff field.
///
/// Returns `None` for descriptive fields, for fields no rule recognises, and
/// for fields whose matching rule fails to extract a window or rate.
///
/// # Examples
///
/// ```
/// use tariff_engine::classify::classify;
/// use tariff_engine::model::{RateTerm, TimeWindow};
///
/// let charge = classify("Aft 6pm: $2 per entry").unwrap();
/// assert_eq!(charge.window, Some(TimeWindow::open_ended(18.0)));
/// assert_eq!(charge.term, RateTerm::PerEntry { amount: 2.0 });
///
/// assert!(classify("Coupon parking").is_none());
/// ```
pub fn classify(raw: &str) -> Option<CanonicalCharge> {
    if !has_monetary_signal(raw) {
        debug!(field = raw, "no monetary value, skipping");
        return None;
    }

    let field = TariffField::new(raw);
    let Some(rule) = RULES.iter().find(|rule| (rule.matches)(&field)) else {
        debug!(field = raw, "no tariff rule matches");
        return None;
    };

    let charge = (rule.extract)(&field);
    match &charge {
        Some(_) => debug!(rule = rule.name, field = raw, "classified tariff field"),
        None => debug!(rule = rule.name, field = raw, "tariff rule matched but extraction failed"),
    }
    charge
}

// ── Extractors ──────────────────────────────────────────────────────────────

fn extract_daily(field: &TariffField<'_>) -> Option<CanonicalCharge> {
    let charge = standardize_separators(field.charge());
    let term = if charge.contains("sub") {
        extract_tiered_rate(&charge)?
    } else {
        extract_flat_rate(&charge)?
    };
    Some(CanonicalCharge::daily(term))
}

fn extract_after_entry(field: &TariffField<'_>) -> Option<CanonicalCharge> {
    let window = extract_window(field.time())?;
    let term = extract_per_entry(field.charge())?;
    Some(CanonicalCharge {
        window: Some(window),
        term,
    })
}

fn extract_timed(field: &TariffField<'_>) -> Option<CanonicalCharge> {
    let window = extract_window(field.time())?;
    let charge = field.charge();
    let term = if charge.contains("sub") {
        extract_tiered_rate(charge)?
    } else if charge.matches('$').count() == 1 {
        extract_flat_rate(charge)?
    } else {
        return None;
    };
    Some(CanonicalCharge::windowed(window, term))
}

fn extract_all_day_entry(field: &TariffField<'_>) -> Option<CanonicalCharge> {
    let term = extract_per_entry(field.raw)?;
    Some(CanonicalCharge {
        window: Some(TimeWindow::all_day()),
        term,
    })
}

fn extract_dashed(field: &TariffField<'_>) -> Option<CanonicalCharge> {
    let (time, charge) = field.raw.split_once(" - ")?;

    if has_both_meridiems(time) {
        if !charge.contains("sub") {
            return None;
        }
        let window = extract_window(time)?;
        let term = extract_tiered_rate(charge)?;
        return Some(CanonicalCharge::windowed(window, term));
    }

    if is_after(time) {
        let window = extract_window(time)?;
        let term = extract_entry_amount(&remove_word(charge, "flat"))?;
        return Some(CanonicalCharge {
            window: Some(window),
            term,
        });
    }

    None
}

fn extract_all_day_tiered(field: &TariffField<'_>) -> Option<CanonicalCharge> {
    let term = extract_tiered_rate(field.raw)?;
    Some(CanonicalCharge::windowed(TimeWindow::all_day(), term))
}

/// Drop every whitespace-delimited occurrence of `word` (any case).
fn remove_word(text: &str, word: &str) -> String {
    text.split_whitespace()
        .filter(|w| !w.eq_ignore_ascii_case(word))
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Tests ───────────────────────────────────────────────────────────────────
