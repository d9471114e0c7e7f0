//! Rate-term extraction.
//!
//! Three independent sub-parsers over the charge part of a tariff field:
//!
//! - [`extract_flat_rate`] — `"$1.20 per 30 mins"`, `"$0.80/30mins"`
//! - [`extract_tiered_rate`] — `"$1.40 per 1st hr; $0.80 per sub 30mins"`
//! - [`extract_per_entry`] — `"$2 per entry"`
//!
//! Each returns `None` when the text does not have the expected shape or a
//! number fails to parse. A term is never partially filled.

use crate::model::RateTerm;
use crate::normalize::{collapse_whitespace, normalize};

/// Minutes in the literal unit `hr`.
const MINUTES_PER_HOUR: f64 = 60.0;

// ── Flat rate ───────────────────────────────────────────────────────────────

/// Parse a flat `"$X per Y mins"` rate.
///
/// `/` and the word `for` are read as `per` before splitting. The left side
/// must be a `$` amount and the right side a minute count once units are
/// normalized.
///
/// # Examples
///
/// ```
/// use tariff_engine::model::RateTerm;
/// use tariff_engine::rate::extract_flat_rate;
///
/// assert_eq!(
///     extract_flat_rate("$0.80/30mins"),
///     Some(RateTerm::PerUnitTime { base_rate: 0.8, base_unit_minutes: 30.0 })
/// );
/// assert_eq!(extract_flat_rate("$2 per entry"), None);
/// ```
pub fn extract_flat_rate(charge: &str) -> Option<RateTerm> {
    let text = normalize(&standardize_separators(charge));
    let text = match text.strip_suffix("min") {
        Some(head) => format!("{head}mins"),
        None => text,
    };

    let (price, unit) = text.split_once(" per ")?;
    let price = price.trim().strip_prefix('$')?;
    let unit = unit.trim().strip_suffix("mins")?;

    Some(RateTerm::PerUnitTime {
        base_rate: parse_amount(price)?,
        base_unit_minutes: parse_amount(unit)?,
    })
}

/// Read `/` and `for` as `per`, then collapse the whitespace that leaves.
pub(crate) fn standardize_separators(charge: &str) -> String {
    let text = charge.replace('/', " per ");
    let text = text
        .split_whitespace()
        .map(|word| if word == "for" { "per" } else { word })
        .collect::<Vec<_>>()
        .join(" ");
    collapse_whitespace(&text)
}

// ── Tiered rate ─────────────────────────────────────────────────────────────

/// Where the tiered scan is in its fixed token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TierScan {
    BaseRate,
    BaseUnit,
    SubsequentRate,
    SubsequentUnit,
}

/// Parse a two-tier `"$X per 1st N; $Y per sub M"` rate.
///
/// The scan looks for, in order: a `$` token (base rate), a `1st` token and
/// the token after it (base unit), a second `$` token (subsequent rate), and
/// finally either the token after a `sub…` token or a token ending in `mins`
/// (subsequent unit). Tokens in any other order make the parse fail.
///
/// # Examples
///
/// ```
/// use tariff_engine::model::RateTerm;
/// use tariff_engine::rate::extract_tiered_rate;
///
/// assert_eq!(
///     extract_tiered_rate("$1.40 per 1st hr; $0.80 per sub 30mins"),
///     Some(RateTerm::TieredPerUnitTime {
///         base_rate: 1.4,
///         base_unit_minutes: 60.0,
///         subsequent_rate: 0.8,
///         subsequent_unit_minutes: 30.0,
///     })
/// );
/// ```
pub fn extract_tiered_rate(charge: &str) -> Option<RateTerm> {
    let text = standardize_tiers(charge);
    let tokens: Vec<&str> = text.split_whitespace().collect();

    let mut state = TierScan::BaseRate;
    let mut attributes: Vec<String> = Vec::with_capacity(4);
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        let lower = token.to_lowercase();
        match state {
            TierScan::BaseRate | TierScan::SubsequentRate if token.starts_with('$') => {
                attributes.push(token.to_string());
                state = if state == TierScan::BaseRate {
                    TierScan::BaseUnit
                } else {
                    TierScan::SubsequentUnit
                };
            }
            TierScan::BaseUnit if token.starts_with("1st") => {
                let quantity = tokens.get(i + 1)?;
                attributes.push(quantity.replace(';', ""));
                state = TierScan::SubsequentRate;
                i += 1;
            }
            TierScan::SubsequentUnit if lower.starts_with("sub") => {
                let quantity = tokens.get(i + 1)?;
                attributes.push(quantity.replace("mins", ""));
                break;
            }
            TierScan::SubsequentUnit if lower.ends_with("mins") => {
                attributes.push(token.replace("mins", ""));
                break;
            }
            _ => {}
        }
        i += 1;
    }

    tier_attributes_to_term(&attributes)
}

/// Apply unit normalization plus the rewrites specific to tiered text.
fn standardize_tiers(charge: &str) -> String {
    let text = normalize(charge).replace("sub.", "sub. ");
    let text = collapse_whitespace(&text);
    text.replace("sub. hr", "sub. 60mins")
        .replace("sub. min", "sub. 1mins")
}

/// Convert the four scanned attributes into a term.
fn tier_attributes_to_term(attributes: &[String]) -> Option<RateTerm> {
    let [base_rate, base_unit, subsequent_rate, subsequent_unit] = attributes else {
        return None;
    };

    let base_rate = parse_amount(base_rate.trim().trim_start_matches('$'))?;

    let base_unit = base_unit.strip_suffix(',').unwrap_or(base_unit);
    let base_unit_minutes = if let Some(minutes) = base_unit.strip_suffix("mins") {
        parse_amount(minutes)?
    } else if base_unit.eq_ignore_ascii_case("hr") {
        MINUTES_PER_HOUR
    } else {
        return None;
    };

    let subsequent_rate = subsequent_rate.replace('$', "").replace("/min", "");
    let subsequent_rate = parse_amount(&subsequent_rate)?;

    let subsequent_unit_minutes = if strip_punctuation(subsequent_unit).eq_ignore_ascii_case("hr") {
        MINUTES_PER_HOUR
    } else {
        let digits: String = subsequent_unit
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        parse_amount(&digits)?
    };

    Some(RateTerm::TieredPerUnitTime {
        base_rate,
        base_unit_minutes,
        subsequent_rate,
        subsequent_unit_minutes,
    })
}

fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| c.is_ascii_punctuation())
}

// ── Per-entry rate ──────────────────────────────────────────────────────────

/// Parse a `"$X per entry"` amount.
///
/// Only selected when the text contains `per entry` (any case); the amount
/// is the first `$` token.
pub fn extract_per_entry(charge: &str) -> Option<RateTerm> {
    if !mentions_per_entry(charge) {
        return None;
    }
    extract_entry_amount(charge)
}

/// The first `$` token of `charge` as a per-entry amount.
///
/// Used directly for flat entry fees such as `"$2 flat"`, which carry no
/// `per entry` phrase.
pub fn extract_entry_amount(charge: &str) -> Option<RateTerm> {
    let charge = normalize(charge);
    let token = charge.split_whitespace().find(|t| t.starts_with('$'))?;
    let amount = parse_amount(token.trim_start_matches('$').trim_end_matches([',', ';', '.']))?;
    Some(RateTerm::PerEntry { amount })
}

/// Whether the text contains the phrase `per entry` (any case).
pub fn mentions_per_entry(text: &str) -> bool {
    text.to_lowercase().contains("per entry")
}

// ── Numerals ────────────────────────────────────────────────────────────────

/// Parse a non-negative, finite decimal.
pub(crate) fn parse_amount(s: &str) -> Option<f64> {
    let value: f64 = s.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

// ── Tests ───────────────────────────────────────────────────────────────────
