//! Unit normalization for tariff text.
//!
//! Rewrites the spelling variants of time units found in tariff descriptions
//! (`½ hr`, `1½ hrs`, `2hrs`, `per hr`, `per min`, `Free`) into one canonical
//! lexical form: integer minute counts followed by `mins`, and `$0` for free
//! parking. Later stages only ever see that form.
//!
//! # Ordering
//!
//! Substitutions run in table order and the table lists longer patterns
//! before any shorter pattern they contain (`2½ hrs` before `½ hr`,
//! `2 hrs` before `2 hr`). Patterns that begin or end with a letter or digit
//! only match on word boundaries, so `12 hr` is not mistaken for `2 hr`.
//! Passes repeat until the text stops changing, which makes [`normalize`]
//! idempotent.

/// Literal rewrites, applied in order.
const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("2½ hrs", "150mins"),
    ("2½hrs", "150mins"),
    ("2½ hr", "150mins"),
    ("2½hr", "150mins"),
    ("1½ hrs", "90mins"),
    ("1½hrs", "90mins"),
    ("1½ hr", "90mins"),
    ("1½hr", "90mins"),
    ("½ hrs", "30mins"),
    ("½hrs", "30mins"),
    ("½ hr", "30mins"),
    ("½hr", "30mins"),
    ("1/2 hr", "30mins"),
    ("3 hrs", "180mins"),
    ("3hrs", "180mins"),
    ("2-hrs", "120mins"),
    ("2 hrs", "120mins"),
    ("2hrs", "120mins"),
    ("2 hr", "120mins"),
    ("1hr", "60mins"),
    ("per hr", "per 60mins"),
    ("per min", "per 1mins"),
    ("Free", "$0"),
    ("free", "$0"),
    ("FREE", "$0"),
];

/// Normalize time and rate idioms in `text`.
///
/// Total and idempotent: `normalize(&normalize(s)) == normalize(s)`.
/// Non-breaking spaces are treated as ordinary spaces.
///
/// # Examples
///
/// ```
/// use tariff_engine::normalize::normalize;
///
/// assert_eq!(normalize("$1.20 per ½ hr"), "$1.20 per 30mins");
/// assert_eq!(normalize("$3 per 1st 2 hrs"), "$3 per 1st 120mins");
/// assert_eq!(normalize("$2.16 per hr"), "$2.16 per 60mins");
/// assert_eq!(normalize("Free per entry"), "$0 per entry");
/// ```
pub fn normalize(text: &str) -> String {
    let mut out = text.replace('\u{00A0}', " ");
    for _ in 0..MAX_PASSES {
        let next = substitute_once(&out);
        if next == out {
            break;
        }
        out = next;
    }
    out
}

/// Upper bound on substitution passes; real text settles in one or two.
const MAX_PASSES: usize = 8;

fn substitute_once(text: &str) -> String {
    let mut out = text.to_string();
    for (pattern, replacement) in SUBSTITUTIONS {
        if out.contains(pattern) {
            out = replace_on_boundaries(&out, pattern, replacement);
        }
    }
    out
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replace occurrences of `pattern` that are not glued to neighbouring
/// letters or digits.
fn replace_on_boundaries(text: &str, pattern: &str, replacement: &str) -> String {
    let guard_before = pattern.chars().next().is_some_and(char::is_alphanumeric);
    let guard_after = pattern.chars().next_back().is_some_and(char::is_alphanumeric);

    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for (start, _) in text.match_indices(pattern) {
        let end = start + pattern.len();
        let glued_before =
            guard_before && text[..start].chars().next_back().is_some_and(char::is_alphanumeric);
        let glued_after =
            guard_after && text[end..].chars().next().is_some_and(char::is_alphanumeric);
        if glued_before || glued_after {
            continue;
        }
        out.push_str(&text[copied..start]);
        out.push_str(replacement);
        copied = end;
    }
    out.push_str(&text[copied..]);
    out
}

// ── Tests ───────────────────────────────────────────────────────────────────
