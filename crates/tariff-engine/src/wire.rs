//! JSON-lines encoding of facility records.
//!
//! One object per line:
//!
//! ```json
//! {"name":"Bugis Junction","category":"Others",
//!  "weekdays_rate_1":{"timing":{"startTime":7.0,"endTime":19.0},
//!                     "pricePerUnitTime":{"baseRate":1.2,"baseRateTimeUnitInMins":30.0}}}
//! ```
//!
//! Empty slots are omitted. Each charge carries exactly one of
//! `pricePerEntry`, `pricePerUnitTime` or `dailyPricePerUnitTime`; daily
//! charges have no `timing`.

use std::io::{BufRead, Write};
use std::sync::Arc;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TariffError};
use crate::model::{
    CanonicalCharge, ChargeKind, FacilityRateRecord, RateTerm, SharedCharge, Slot, TimeWindow,
};

// ── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct RecordWire {
    name: String,
    category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weekdays_rate_1: Option<ChargeWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weekdays_rate_2: Option<ChargeWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saturday_rate_1: Option<ChargeWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saturday_rate_2: Option<ChargeWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sunday_publicholiday_rate_1: Option<ChargeWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sunday_publicholiday_rate_2: Option<ChargeWire>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChargeWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timing: Option<TimingWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    price_per_entry: Option<RateWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    price_per_unit_time: Option<RateWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    daily_price_per_unit_time: Option<RateWire>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimingWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_time: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RateWire {
    base_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_rate_time_unit_in_mins: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subsequent_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subsequent_rate_time_unit_in_mins: Option<f64>,
}

// ── Model → wire ────────────────────────────────────────────────────────────

impl From<&RateTerm> for RateWire {
    fn from(term: &RateTerm) -> Self {
        match *term {
            RateTerm::PerUnitTime {
                base_rate,
                base_unit_minutes,
            } => RateWire {
                base_rate,
                base_rate_time_unit_in_mins: Some(base_unit_minutes),
                subsequent_rate: None,
                subsequent_rate_time_unit_in_mins: None,
            },
            RateTerm::TieredPerUnitTime {
                base_rate,
                base_unit_minutes,
                subsequent_rate,
                subsequent_unit_minutes,
            } => RateWire {
                base_rate,
                base_rate_time_unit_in_mins: Some(base_unit_minutes),
                subsequent_rate: Some(subsequent_rate),
                subsequent_rate_time_unit_in_mins: Some(subsequent_unit_minutes),
            },
            RateTerm::PerEntry { amount } => RateWire {
                base_rate: amount,
                base_rate_time_unit_in_mins: None,
                subsequent_rate: None,
                subsequent_rate_time_unit_in_mins: None,
            },
        }
    }
}

impl From<&CanonicalCharge> for ChargeWire {
    fn from(charge: &CanonicalCharge) -> Self {
        let rate = Some(RateWire::from(&charge.term));
        let timing = charge.window.map(|w| TimingWire {
            start_time: Some(w.start),
            end_time: w.end,
        });
        match charge.kind() {
            ChargeKind::PricePerEntry => ChargeWire {
                timing,
                price_per_entry: rate,
                ..Default::default()
            },
            ChargeKind::PricePerUnitTime => ChargeWire {
                timing,
                price_per_unit_time: rate,
                ..Default::default()
            },
            ChargeKind::DailyPricePerUnitTime => ChargeWire {
                daily_price_per_unit_time: rate,
                ..Default::default()
            },
        }
    }
}

impl From<&FacilityRateRecord> for RecordWire {
    fn from(record: &FacilityRateRecord) -> Self {
        let wire = |slot: Slot| record.charge(slot).map(ChargeWire::from);
        RecordWire {
            name: record.name.clone(),
            category: record.category.clone(),
            weekdays_rate_1: wire(Slot::Weekday1),
            weekdays_rate_2: wire(Slot::Weekday2),
            saturday_rate_1: wire(Slot::Saturday1),
            saturday_rate_2: wire(Slot::Saturday2),
            sunday_publicholiday_rate_1: wire(Slot::SundayHoliday1),
            sunday_publicholiday_rate_2: wire(Slot::SundayHoliday2),
        }
    }
}

// ── Wire → model ────────────────────────────────────────────────────────────

impl TryFrom<ChargeWire> for CanonicalCharge {
    type Error = String;

    fn try_from(wire: ChargeWire) -> std::result::Result<Self, Self::Error> {
        let window = wire
            .timing
            .map(|t| match t.start_time {
                Some(start) => Ok(TimeWindow {
                    start,
                    end: t.end_time,
                }),
                None => Err("timing without startTime".to_string()),
            })
            .transpose()?;

        match (
            wire.price_per_entry,
            wire.price_per_unit_time,
            wire.daily_price_per_unit_time,
        ) {
            (Some(rate), None, None) => {
                let window = window.ok_or("pricePerEntry without timing")?;
                Ok(CanonicalCharge::per_entry(window, rate.base_rate))
            }
            (None, Some(rate), None) => {
                let window = window.ok_or("pricePerUnitTime without timing")?;
                if window.end.is_none() {
                    return Err("pricePerUnitTime timing without endTime".to_string());
                }
                Ok(CanonicalCharge::windowed(window, rate.into_unit_term()?))
            }
            (None, None, Some(rate)) => {
                if window.is_some() {
                    return Err("dailyPricePerUnitTime with timing".to_string());
                }
                Ok(CanonicalCharge::daily(rate.into_unit_term()?))
            }
            _ => Err("charge must have exactly one rate object".to_string()),
        }
    }
}

impl RateWire {
    fn into_unit_term(self) -> std::result::Result<RateTerm, String> {
        let base_unit_minutes = self
            .base_rate_time_unit_in_mins
            .ok_or("unit-time rate without baseRateTimeUnitInMins")?;
        match (self.subsequent_rate, self.subsequent_rate_time_unit_in_mins) {
            (None, None) => Ok(RateTerm::PerUnitTime {
                base_rate: self.base_rate,
                base_unit_minutes,
            }),
            (Some(subsequent_rate), Some(subsequent_unit_minutes)) => {
                Ok(RateTerm::TieredPerUnitTime {
                    base_rate: self.base_rate,
                    base_unit_minutes,
                    subsequent_rate,
                    subsequent_unit_minutes,
                })
            }
            _ => Err("subsequentRate and its time unit must appear together".to_string()),
        }
    }
}

impl TryFrom<RecordWire> for FacilityRateRecord {
    type Error = String;

    fn try_from(wire: RecordWire) -> std::result::Result<Self, Self::Error> {
        let charge = |w: Option<ChargeWire>| -> std::result::Result<Option<SharedCharge>, String> {
            w.map(|w| CanonicalCharge::try_from(w).map(Arc::new))
                .transpose()
        };
        Ok(FacilityRateRecord::new(
            wire.name,
            wire.category,
            [
                charge(wire.weekdays_rate_1)?,
                charge(wire.weekdays_rate_2)?,
                charge(wire.saturday_rate_1)?,
                charge(wire.saturday_rate_2)?,
                charge(wire.sunday_publicholiday_rate_1)?,
                charge(wire.sunday_publicholiday_rate_2)?,
            ],
        ))
    }
}

impl Serialize for FacilityRateRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        RecordWire::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FacilityRateRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let wire = RecordWire::deserialize(deserializer)?;
        FacilityRateRecord::try_from(wire).map_err(D::Error::custom)
    }
}

// ── Reading and writing ─────────────────────────────────────────────────────

/// Write records as JSON lines. Returns the number of lines written.
pub fn write_records<'a, W, I>(mut writer: W, records: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a FacilityRateRecord>,
{
    let mut written = 0;
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Read records from JSON lines. Blank lines are skipped.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<FacilityRateRecord>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| TariffError::InvalidRecord {
            line: index + 1,
            reason: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

// ── Tests ───────────────────────────────────────────────────────────────────
