//! Canonical tariff model.
//!
//! Everything the parser produces is expressed with these types. Absent
//! components are `None`, never a magic number, and a [`FacilityRateRecord`]
//! hands out its charges through [`Arc`] so carried-over slots alias the
//! weekday charge instead of copying it.

use std::fmt;
use std::sync::Arc;

/// Clock value meaning "until the end of the day" (23:59) for charges that
/// carry no explicit upper bound.
pub const END_OF_DAY: f64 = 23.59;

/// Clock value for the start of the day.
pub const START_OF_DAY: f64 = 0.0;

// ── Time windows ────────────────────────────────────────────────────────────

/// The time of day a charge applies.
///
/// Hours use clock-style decimal notation: the numeral in front of the
/// meridiem is kept verbatim (`8.30am` → `8.30`) and `pm` adds twelve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    /// `None` for open-ended windows such as "after 6pm".
    pub end: Option<f64>,
}

impl TimeWindow {
    /// A window with both bounds.
    pub fn bounded(start: f64, end: f64) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// A window that starts at `start` and runs for the rest of the day.
    pub fn open_ended(start: f64) -> Self {
        Self { start, end: None }
    }

    /// The implicit 00:00–23:59 window used when no time is given.
    pub fn all_day() -> Self {
        Self::bounded(START_OF_DAY, END_OF_DAY)
    }

    /// Whether the clock value `at` falls within this window.
    pub fn contains(&self, at: f64) -> bool {
        self.start <= at && self.end.is_none_or(|end| end >= at)
    }
}

// ── Rate terms ──────────────────────────────────────────────────────────────

/// The price part of a charge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateTerm {
    /// `$1.20 per 30 mins`
    PerUnitTime {
        base_rate: f64,
        base_unit_minutes: f64,
    },
    /// `$1.40 per 1st hr; $0.80 per sub 30mins`
    TieredPerUnitTime {
        base_rate: f64,
        base_unit_minutes: f64,
        subsequent_rate: f64,
        subsequent_unit_minutes: f64,
    },
    /// `$2 per entry`
    PerEntry { amount: f64 },
}

impl RateTerm {
    /// The first (or only) price of the term.
    pub fn base_rate(&self) -> f64 {
        match *self {
            RateTerm::PerUnitTime { base_rate, .. }
            | RateTerm::TieredPerUnitTime { base_rate, .. } => base_rate,
            RateTerm::PerEntry { amount } => amount,
        }
    }

    /// The time unit the base rate is charged per, if the term has one.
    pub fn base_unit_minutes(&self) -> Option<f64> {
        match *self {
            RateTerm::PerUnitTime {
                base_unit_minutes, ..
            }
            | RateTerm::TieredPerUnitTime {
                base_unit_minutes, ..
            } => Some(base_unit_minutes),
            RateTerm::PerEntry { .. } => None,
        }
    }

    /// Base rate divided by its time unit.
    pub fn rate_per_minute(&self) -> Option<f64> {
        let unit = self.base_unit_minutes()?;
        if unit == 0.0 {
            return None;
        }
        Some((self.base_rate() / unit).abs())
    }
}

// ── Charges ─────────────────────────────────────────────────────────────────

/// How a charge is labelled downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChargeKind {
    PricePerEntry,
    PricePerUnitTime,
    DailyPricePerUnitTime,
}

impl ChargeKind {
    /// The key used for this kind in the JSON-lines format.
    pub fn json_key(self) -> &'static str {
        match self {
            ChargeKind::PricePerEntry => "pricePerEntry",
            ChargeKind::PricePerUnitTime => "pricePerUnitTime",
            ChargeKind::DailyPricePerUnitTime => "dailyPricePerUnitTime",
        }
    }

    /// The charge-type node name used in triple export.
    pub fn type_name(self) -> &'static str {
        match self {
            ChargeKind::PricePerEntry => "PricePerEntry",
            ChargeKind::PricePerUnitTime => "PricePerUnitTime",
            ChargeKind::DailyPricePerUnitTime => "DailyPricePerUnitTime",
        }
    }
}

/// One parsed tariff field.
///
/// Per-entry charges always carry a window. Time-based charges carry a
/// bounded window, or no window at all when they apply daily.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalCharge {
    pub window: Option<TimeWindow>,
    pub term: RateTerm,
}

impl CanonicalCharge {
    pub fn per_entry(window: TimeWindow, amount: f64) -> Self {
        Self {
            window: Some(window),
            term: RateTerm::PerEntry { amount },
        }
    }

    pub fn windowed(window: TimeWindow, term: RateTerm) -> Self {
        Self {
            window: Some(window),
            term,
        }
    }

    pub fn daily(term: RateTerm) -> Self {
        Self { window: None, term }
    }

    pub fn kind(&self) -> ChargeKind {
        match (&self.term, &self.window) {
            (RateTerm::PerEntry { .. }, _) => ChargeKind::PricePerEntry,
            (_, Some(_)) => ChargeKind::PricePerUnitTime,
            (_, None) => ChargeKind::DailyPricePerUnitTime,
        }
    }

    /// Whether the charge is in force at clock value `at`. Daily charges
    /// always are.
    pub fn applies_at(&self, at: f64) -> bool {
        self.window.is_none_or(|w| w.contains(at))
    }
}

/// A charge as stored in a record; slots may share one allocation.
pub type SharedCharge = Arc<CanonicalCharge>;

// ── Slots and records ───────────────────────────────────────────────────────

/// The six charge positions of a facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Weekday1,
    Weekday2,
    Saturday1,
    Saturday2,
    SundayHoliday1,
    SundayHoliday2,
}

impl Slot {
    pub const ALL: [Slot; 6] = [
        Slot::Weekday1,
        Slot::Weekday2,
        Slot::Saturday1,
        Slot::Saturday2,
        Slot::SundayHoliday1,
        Slot::SundayHoliday2,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn json_key(self) -> &'static str {
        match self {
            Slot::Weekday1 => "weekdays_rate_1",
            Slot::Weekday2 => "weekdays_rate_2",
            Slot::Saturday1 => "saturday_rate_1",
            Slot::Saturday2 => "saturday_rate_2",
            Slot::SundayHoliday1 => "sunday_publicholiday_rate_1",
            Slot::SundayHoliday2 => "sunday_publicholiday_rate_2",
        }
    }

    pub fn from_json_key(key: &str) -> Option<Slot> {
        Slot::ALL.into_iter().find(|slot| slot.json_key() == key)
    }

    pub fn day(self) -> DayClass {
        match self {
            Slot::Weekday1 | Slot::Weekday2 => DayClass::Weekday,
            Slot::Saturday1 | Slot::Saturday2 => DayClass::Saturday,
            Slot::SundayHoliday1 | Slot::SundayHoliday2 => DayClass::SundayHoliday,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_key())
    }
}

/// The day classes the source table distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayClass {
    Weekday,
    Saturday,
    SundayHoliday,
}

impl DayClass {
    pub fn slots(self) -> [Slot; 2] {
        match self {
            DayClass::Weekday => [Slot::Weekday1, Slot::Weekday2],
            DayClass::Saturday => [Slot::Saturday1, Slot::Saturday2],
            DayClass::SundayHoliday => [Slot::SundayHoliday1, Slot::SundayHoliday2],
        }
    }
}

impl std::str::FromStr for DayClass {
    type Err = crate::error::TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekday" | "weekdays" | "wkday" => Ok(DayClass::Weekday),
            "saturday" | "sat" => Ok(DayClass::Saturday),
            "sunday" | "sun" | "holiday" | "sunday_publicholiday" => Ok(DayClass::SundayHoliday),
            _ => Err(crate::error::TariffError::InvalidDay(s.to_string())),
        }
    }
}

/// The canonical rates of one facility.
///
/// Built once by the assembler and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityRateRecord {
    pub name: String,
    pub category: String,
    charges: [Option<SharedCharge>; 6],
}

impl FacilityRateRecord {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        charges: [Option<SharedCharge>; 6],
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            charges,
        }
    }

    /// A record with every slot empty.
    pub fn empty(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self::new(name, category, Default::default())
    }

    pub fn charge(&self, slot: Slot) -> Option<&CanonicalCharge> {
        self.charges[slot.index()].as_deref()
    }

    /// The shared handle behind a slot, for alias checks.
    pub fn shared(&self, slot: Slot) -> Option<&SharedCharge> {
        self.charges[slot.index()].as_ref()
    }

    /// Present charges in slot order.
    pub fn charges(&self) -> impl Iterator<Item = (Slot, &CanonicalCharge)> + '_ {
        Slot::ALL
            .into_iter()
            .filter_map(|slot| self.charge(slot).map(|charge| (slot, charge)))
    }

    pub fn has_charges(&self) -> bool {
        self.charges.iter().any(Option::is_some)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
