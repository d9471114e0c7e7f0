//! Time-window extraction.
//!
//! Turns the time part of a tariff field (`"7am-7pm"`, `"7am to 7pm"`,
//! `"Aft 6pm"`, `"Daily"`) into a [`TimeWindow`].
//!
//! Meridiem handling is literal: `pm` adds twelve to whatever numeral
//! precedes it and `am` passes the numeral through unchanged. `12am` is
//! therefore `12` and `12pm` is `24`; windows that cross midnight are not
//! unwrapped.

use crate::model::TimeWindow;
use crate::rate::parse_amount;

/// Extract a time window from a time token.
///
/// Returns `None` both for `daily` tokens (the charge applies all day and
/// carries no window) and for tokens of no recognised shape. Use
/// [`is_daily`] to tell the two apart.
///
/// # Examples
///
/// ```
/// use tariff_engine::model::TimeWindow;
/// use tariff_engine::window::extract_window;
///
/// assert_eq!(extract_window("7am-7pm"), Some(TimeWindow::bounded(7.0, 19.0)));
/// assert_eq!(extract_window("Aft 6pm"), Some(TimeWindow::open_ended(18.0)));
/// assert_eq!(extract_window("Daily"), None);
/// ```
pub fn extract_window(token: &str) -> Option<TimeWindow> {
    let token = token.replace('\u{00A0}', " ");
    let token = token.trim();

    if is_daily(token) {
        return None;
    }
    if let Some(rest) = strip_after_prefix(token) {
        return parse_after(rest);
    }
    if has_both_meridiems(token) {
        return parse_range(token);
    }
    None
}

/// Whether the token marks an all-day tariff.
pub fn is_daily(token: &str) -> bool {
    token.trim().to_lowercase().starts_with("daily")
}

/// Whether the token starts with `aft` / `after` (any case).
pub fn is_after(token: &str) -> bool {
    token.trim().to_lowercase().starts_with("aft")
}

/// Whether the token carries both an `am` and a `pm` marker (any case).
pub fn has_both_meridiems(token: &str) -> bool {
    let lower = token.to_lowercase();
    lower.contains("am") && lower.contains("pm")
}

/// Parse `"<time> - <time>"` or `"<time> to <time>"`.
fn parse_range(token: &str) -> Option<TimeWindow> {
    let lower = token.to_lowercase();
    let joined = lower.replace(" to ", "-");
    let (start, end) = joined.split_once('-')?;
    let start = parse_clock(start)?;
    let end = parse_clock(end)?;
    Some(TimeWindow::bounded(start, end))
}

/// Parse the numeral following an `aft` / `after` prefix.
///
/// The meridiem is optional here: a bare `"6"` is taken as written.
fn parse_after(rest: &str) -> Option<TimeWindow> {
    let lower = rest.trim().to_lowercase();
    let start = parse_clock(&lower).or_else(|| parse_amount(&lower))?;
    Some(TimeWindow::open_ended(start))
}

/// Strip a leading `after` or `aft` (any case), returning the remainder.
fn strip_after_prefix(token: &str) -> Option<&str> {
    ["after", "aft"].into_iter().find_map(|prefix| {
        let head = token.get(..prefix.len())?;
        if !head.eq_ignore_ascii_case(prefix) {
            return None;
        }
        let rest = &token[prefix.len()..];
        Some(rest.strip_prefix('.').unwrap_or(rest))
    })
}

/// Parse one side of a window: `"7am"`, `"8.30 am"`, `"7pm"`.
///
/// The side must carry exactly one meridiem marker at its end.
fn parse_clock(side: &str) -> Option<f64> {
    let side = side.trim();
    let (numeral, is_pm) = if let Some(n) = side.strip_suffix("pm") {
        (n, true)
    } else if let Some(n) = side.strip_suffix("am") {
        (n, false)
    } else {
        return None;
    };

    let value = parse_amount(numeral)?;
    Some(if is_pm { value + 12.0 } else { value })
}

// ── Tests ───────────────────────────────────────────────────────────────────
