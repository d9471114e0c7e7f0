//! Property tests for the tariff parsers.

use proptest::prelude::*;

use tariff_engine::normalize::normalize;
use tariff_engine::rate::{extract_flat_rate, extract_per_entry, extract_tiered_rate};
use tariff_engine::window::extract_window;
use tariff_engine::{assemble_with_report, classify, RateTerm, RawTariffFields, Slot};

/// Fragments seen in real tariff text, for building plausible fields.
fn fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "7am", "7pm", "-", " to ", "Aft", "After", "Daily", ":", " ", "$1.20", "$0.80", "$2",
        "per", "for", "/", "30 mins", "30mins", "½ hr", "1½ hrs", "2 hrs", "hr", "min", "1st",
        "sub", "sub.", ";", "entry", "Free", "flat", "Same as", "wkdays", "Saturday", "(max $22.90)",
    ])
}

fn tariff_text() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..12).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn normalize_is_idempotent(text in tariff_text()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_arbitrary_text_is_idempotent(text in "\\PC{0,40}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn parsers_never_panic(text in "\\PC{0,60}") {
        let _ = extract_window(&text);
        let _ = extract_flat_rate(&text);
        let _ = extract_tiered_rate(&text);
        let _ = extract_per_entry(&text);
        let _ = classify(&text);
    }

    #[test]
    fn charges_are_non_negative(text in tariff_text()) {
        if let Some(charge) = classify(&text) {
            prop_assert!(charge.term.base_rate() >= 0.0);
            if let Some(unit) = charge.term.base_unit_minutes() {
                prop_assert!(unit >= 0.0);
            }
            if let RateTerm::TieredPerUnitTime { subsequent_rate, subsequent_unit_minutes, .. } = charge.term {
                prop_assert!(subsequent_rate >= 0.0);
                prop_assert!(subsequent_unit_minutes >= 0.0);
            }
        }
    }

    #[test]
    fn per_entry_terms_carry_no_unit(text in tariff_text()) {
        if let Some(charge) = classify(&text) {
            if let RateTerm::PerEntry { .. } = charge.term {
                prop_assert!(charge.term.base_unit_minutes().is_none());
                prop_assert!(charge.window.is_some());
            }
        }
    }

    #[test]
    fn descriptive_weekday_leaves_record_empty(
        weekday_2 in tariff_text(),
        saturday in tariff_text(),
        sunday in tariff_text(),
    ) {
        let assembled = assemble_with_report(&RawTariffFields {
            name: "X",
            category: "Y",
            weekday_1: "Season parking only",
            weekday_2: &weekday_2,
            saturday: &saturday,
            sunday_holiday: &sunday,
        });
        prop_assert!(!assembled.record.has_charges());
        prop_assert!(assembled.unparsed.is_empty());
    }

    #[test]
    fn second_weekday_never_duplicates_first(
        weekday_1 in tariff_text(),
        weekday_2 in tariff_text(),
    ) {
        let assembled = assemble_with_report(&RawTariffFields {
            name: "X",
            category: "Y",
            weekday_1: &weekday_1,
            weekday_2: &weekday_2,
            ..Default::default()
        });
        let record = assembled.record;
        if let (Some(a), Some(b)) = (record.charge(Slot::Weekday1), record.charge(Slot::Weekday2)) {
            prop_assert_ne!(a, b);
        }
    }
}

#[test]
fn unit_substitutions_yield_integer_minutes() {
    for text in ["½ hr", "1½ hrs", "2 hrs", "3 hrs", "1hr", "per hr", "per min"] {
        let normalized = normalize(text);
        let minutes: String = normalized
            .split_whitespace()
            .filter_map(|w| w.strip_suffix("mins"))
            .collect();
        let value: f64 = minutes.parse().unwrap_or_else(|_| panic!("{text} -> {normalized}"));
        assert_eq!(value.fract(), 0.0, "{text} -> {normalized}");
    }
}
