//! Year correction and sentinel removal for monthly records.
//!
//! # Effective Year Convention
//!
//! November and December readings belong to the preceding year's record
//! set: a row stored as December 2006 is reported under 2005. Every
//! year filter and grouping downstream works on this effective year, never
//! on the stored calendar year.

use crate::record::{NormalizedRecord, RawMonthlyRecord};

/// Level value upstream loggers write when there is no reading.
pub const LEVEL_SENTINEL: f64 = 9999.0;

/// Highest temperature any deployed datalogger can report. Above it the
/// reading is a fault.
pub const TEMPERATURE_CEILING: f64 = 50.0;

/// Months attributed to the previous effective year.
pub const ROLLBACK_MONTHS: [i32; 2] = [11, 12];

/// Effective year of a row stored under `year`/`month`.
///
/// Months outside 1..=12 are passed through untouched; only 11 and 12 shift.
pub fn effective_year(year: i32, month: i32) -> i32 {
    if ROLLBACK_MONTHS.contains(&month) {
        year.saturating_sub(1)
    } else {
        year
    }
}

/// `None` for the level sentinel. Exact match only.
pub fn clean_level(level: Option<f64>) -> Option<f64> {
    level.filter(|v| *v != LEVEL_SENTINEL)
}

/// `None` for readings strictly above [`TEMPERATURE_CEILING`]. 50.0 itself is kept.
pub fn clean_temperature(temperature: Option<f64>) -> Option<f64> {
    temperature.filter(|v| *v <= TEMPERATURE_CEILING)
}

/// Converts a record into its normalized form.
///
/// Applying it to an already normalized record changes nothing: the year
/// shift is only performed on raw rows, and the sentinel rules are stable.
pub trait Normalize {
    fn normalize(&self) -> NormalizedRecord;
}

impl Normalize for RawMonthlyRecord {
    fn normalize(&self) -> NormalizedRecord {
        NormalizedRecord {
            year: effective_year(self.year, self.month),
            month: self.month,
            role: self.role,
            level: clean_level(self.level),
            flow: self.flow,
            temperature: clean_temperature(self.temperature),
        }
    }
}

impl Normalize for NormalizedRecord {
    fn normalize(&self) -> NormalizedRecord {
        NormalizedRecord {
            level: clean_level(self.level),
            temperature: clean_temperature(self.temperature),
            ..self.clone()
        }
    }
}
