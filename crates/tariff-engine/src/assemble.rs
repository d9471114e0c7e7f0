//! Record assembly.
//!
//! Applies the cross-field rules of a facility row and fills the six charge
//! slots of a [`FacilityRateRecord`]:
//!
//! 1. A weekday-1 field with no monetary value means the facility has no
//!    machine-readable tariff; every slot stays empty.
//! 2. Weekday fields are classified independently; a second weekday charge
//!    identical to the first is dropped.
//! 3. A Saturday field mentioning `same` shares the weekday charges.
//! 4. A Sunday/holiday field mentioning `same` and `wkday` shares the weekday
//!    charges; `same` and `saturday` shares the Saturday charges.
//!
//! Shared slots hold the same [`Arc`](std::sync::Arc); nothing is re-parsed
//! or cloned.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::classify::{classify, has_monetary_signal};
use crate::model::{FacilityRateRecord, SharedCharge, Slot};

/// The six raw fields of one facility row, as handed over by the row reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTariffFields<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub weekday_1: &'a str,
    pub weekday_2: &'a str,
    pub saturday: &'a str,
    pub sunday_holiday: &'a str,
}

/// A record plus the slots whose own field failed to classify.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembled {
    pub record: FacilityRateRecord,
    /// Slots whose raw field was non-empty, not carried over, and unparsed.
    /// Descriptive (non-monetary) fields are not counted.
    pub unparsed: Vec<Slot>,
}

/// Assemble the canonical record for one facility.
///
/// # Examples
///
/// ```
/// use tariff_engine::assemble::{assemble, RawTariffFields};
/// use tariff_engine::model::Slot;
///
/// let record = assemble(&RawTariffFields {
///     name: "Bugis Junction",
///     category: "Others",
///     weekday_1: "Daily: $1.20/30mins",
///     weekday_2: "",
///     saturday: "Same as wkdays",
///     sunday_holiday: "Same as Saturday",
/// });
/// assert!(record.charge(Slot::SundayHoliday1).is_some());
/// ```
pub fn assemble(fields: &RawTariffFields<'_>) -> FacilityRateRecord {
    assemble_with_report(fields).record
}

/// Assemble the canonical record and report which slots went unparsed.
pub fn assemble_with_report(fields: &RawTariffFields<'_>) -> Assembled {
    let mut report = SlotParser::default();

    if !has_monetary_signal(fields.weekday_1) {
        debug!(
            carpark = fields.name,
            weekday_1 = fields.weekday_1,
            "weekday rate is descriptive, skipping facility"
        );
        return Assembled {
            record: FacilityRateRecord::empty(fields.name, fields.category),
            unparsed: Vec::new(),
        };
    }

    let weekday_1 = report.parse(Slot::Weekday1, fields.weekday_1);
    let mut weekday_2 = report.parse(Slot::Weekday2, fields.weekday_2);
    if let (Some(first), Some(second)) = (&weekday_1, &weekday_2) {
        if first == second {
            debug!(carpark = fields.name, "second weekday rate duplicates the first, dropping");
            weekday_2 = None;
        }
    }

    let saturday_text = fields.saturday.to_lowercase();
    let (saturday_1, saturday_2) = if saturday_text.contains("same") {
        (weekday_1.clone(), weekday_2.clone())
    } else {
        (report.parse(Slot::Saturday1, fields.saturday), None)
    };

    let sunday_text = fields.sunday_holiday.to_lowercase();
    let (sunday_1, sunday_2) = if sunday_text.contains("same") && sunday_text.contains("wkday") {
        (weekday_1.clone(), weekday_2.clone())
    } else if sunday_text.contains("same") && sunday_text.contains("saturday") {
        (saturday_1.clone(), saturday_2.clone())
    } else {
        (report.parse(Slot::SundayHoliday1, fields.sunday_holiday), None)
    };

    let record = FacilityRateRecord::new(
        fields.name,
        fields.category,
        [weekday_1, weekday_2, saturday_1, saturday_2, sunday_1, sunday_2],
    );

    if !report.unparsed.is_empty() {
        warn!(
            carpark = fields.name,
            slots = ?report.unparsed,
            "tariff fields left unparsed"
        );
    }

    Assembled {
        record,
        unparsed: report.unparsed,
    }
}

/// Classifies fields and remembers which ones failed.
#[derive(Debug, Default)]
struct SlotParser {
    unparsed: Vec<Slot>,
}

impl SlotParser {
    fn parse(&mut self, slot: Slot, raw: &str) -> Option<SharedCharge> {
        let charge = classify(raw).map(Arc::new);
        if charge.is_none() && has_monetary_signal(raw) {
            self.unparsed.push(slot);
        }
        charge
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RateTerm, TimeWindow};

    fn fields<'a>(
        weekday_1: &'a str,
        weekday_2: &'a str,
        saturday: &'a str,
        sunday_holiday: &'a str,
    ) -> RawTariffFields<'a> {
        RawTariffFields {
            name: "Bugis Junction",
            category: "Others",
            weekday_1,
            weekday_2,
            saturday,
            sunday_holiday,
        }
    }

    #[test]
    fn test_descriptive_weekday_empties_whole_record() {
        let assembled = assemble_with_report(&fields(
            "Coupon parking",
            "7am-7pm: $1.20 per 30 mins",
            "Daily: $0.80/30mins",
            "Aft 6pm: $2 per entry",
        ));
        assert!(!assembled.record.has_charges());
        assert!(assembled.unparsed.is_empty());
        assert_eq!(assembled.record.name, "Bugis Junction");
        assert_eq!(assembled.record.category, "Others");
    }

    #[test]
    fn test_independent_slots() {
        let record = assemble(&fields(
            "7am-7pm: $1.20 per 30 mins",
            "Aft 7pm: $2 per entry",
            "Daily: $0.80/30mins",
            "Aft 6pm: $3 per entry",
        ));
        assert_eq!(
            record.charge(Slot::Weekday1).unwrap().window,
            Some(TimeWindow::bounded(7.0, 19.0))
        );
        assert_eq!(
            record.charge(Slot::Weekday2).unwrap().term,
            RateTerm::PerEntry { amount: 2.0 }
        );
        assert_eq!(record.charge(Slot::Saturday1).unwrap().window, None);
        assert!(record.charge(Slot::Saturday2).is_none());
        assert_eq!(
            record.charge(Slot::SundayHoliday1).unwrap().term,
            RateTerm::PerEntry { amount: 3.0 }
        );
        assert!(record.charge(Slot::SundayHoliday2).is_none());
    }

    #[test]
    fn test_duplicate_weekday_rate_dropped() {
        let record = assemble(&fields(
            "7am-7pm: $1.20 per 30 mins",
            "7am-7pm: $1.20/30mins",
            "",
            "",
        ));
        assert!(record.charge(Slot::Weekday1).is_some());
        assert!(record.charge(Slot::Weekday2).is_none());
    }

    #[test]
    fn test_saturday_same_shares_weekday_charges() {
        let record = assemble(&fields(
            "7am-7pm: $1.20 per 30 mins",
            "Aft 7pm: $2 per entry",
            "Same as Weekday",
            "",
        ));
        let weekday_1 = record.shared(Slot::Weekday1).unwrap();
        let weekday_2 = record.shared(Slot::Weekday2).unwrap();
        assert!(Arc::ptr_eq(weekday_1, record.shared(Slot::Saturday1).unwrap()));
        assert!(Arc::ptr_eq(weekday_2, record.shared(Slot::Saturday2).unwrap()));
    }

    #[test]
    fn test_sunday_same_as_weekday() {
        let record = assemble(&fields(
            "7am-7pm: $1.20 per 30 mins",
            "",
            "Daily: $0.80/30mins",
            "Same as wkdays",
        ));
        assert!(Arc::ptr_eq(
            record.shared(Slot::Weekday1).unwrap(),
            record.shared(Slot::SundayHoliday1).unwrap()
        ));
        assert!(record.charge(Slot::SundayHoliday2).is_none());
    }

    #[test]
    fn test_sunday_same_as_saturday_follows_saturday_carry_over() {
        let record = assemble(&fields(
            "7am-7pm: $1.20 per 30 mins",
            "Aft 7pm: $2 per entry",
            "Same as wkdays",
            "Same as Saturday",
        ));
        assert!(Arc::ptr_eq(
            record.shared(Slot::Weekday1).unwrap(),
            record.shared(Slot::SundayHoliday1).unwrap()
        ));
        assert!(Arc::ptr_eq(
            record.shared(Slot::Weekday2).unwrap(),
            record.shared(Slot::SundayHoliday2).unwrap()
        ));
    }

    #[test]
    fn test_sunday_same_as_parsed_saturday() {
        let record = assemble(&fields(
            "7am-7pm: $1.20 per 30 mins",
            "",
            "Daily: $0.80/30mins",
            "Same as Saturday",
        ));
        let saturday = record.shared(Slot::Saturday1).unwrap();
        assert!(Arc::ptr_eq(saturday, record.shared(Slot::SundayHoliday1).unwrap()));
        assert_eq!(saturday.window, None);
    }

    #[test]
    fn test_sunday_same_without_day_is_classified() {
        // "same" alone names no day; the field is classified on its own and,
        // having no monetary value, stays empty.
        let assembled = assemble_with_report(&fields(
            "7am-7pm: $1.20 per 30 mins",
            "",
            "",
            "Same",
        ));
        assert!(assembled.record.charge(Slot::SundayHoliday1).is_none());
        assert!(assembled.unparsed.is_empty());
    }

    #[test]
    fn test_unparsed_slots_reported() {
        let assembled = assemble_with_report(&fields(
            "7am-7pm: $1.20 per 30 mins",
            "7am-9.59pm: $0.036 per min/$2.16 per hr",
            "Same as weekday",
            "8.30am-5pm: $1.20 per ½ hr (max $22.90)",
        ));
        assert_eq!(
            assembled.unparsed,
            vec![Slot::Weekday2, Slot::SundayHoliday1]
        );
        assert!(assembled.record.charge(Slot::Weekday1).is_some());
    }
}
