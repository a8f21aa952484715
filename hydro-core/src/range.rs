//! Year range validation and storage window planning.
//!
//! Storage filters on the stored calendar year, but every request is
//! expressed in effective years. Because November/December rows move back
//! by exactly one year, a request for `[from, to]` is fetched over the raw
//! window `[from - 1, to + 1]` and cut to the exact range after
//! normalization.

use crate::error::ValidationError;
use crate::record::StationId;

/// How far the effective year can sit from the stored year.
pub const YEAR_SHIFT_BUFFER: i32 = 1;

/// Inclusive bounds on the stored calendar year column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawYearWindow {
    pub from: i32,
    pub to: i32,
}

impl RawYearWindow {
    /// Raw window that covers every row whose effective year lies in `[from, to]`.
    ///
    /// Saturates at the ends of `i32`.
    pub fn buffered(from: i32, to: i32) -> Self {
        RawYearWindow {
            from: from.saturating_sub(YEAR_SHIFT_BUFFER),
            to: to.saturating_add(YEAR_SHIFT_BUFFER),
        }
    }
}

/// Requested span of effective years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearRange {
    /// Full history.
    All,
    /// Inclusive bounds.
    Bounded { from: i32, to: i32 },
}

impl YearRange {
    /// A range covering one effective year.
    pub fn single(year: i32) -> Self {
        YearRange::Bounded { from: year, to: year }
    }

    pub fn contains(&self, effective_year: i32) -> bool {
        match *self {
            YearRange::All => true,
            YearRange::Bounded { from, to } => (from..=to).contains(&effective_year),
        }
    }

    /// Raw-year window to hand to storage, `None` for the full history.
    pub fn storage_window(&self) -> Option<RawYearWindow> {
        match *self {
            YearRange::All => None,
            YearRange::Bounded { from, to } => Some(RawYearWindow::buffered(from, to)),
        }
    }
}

/// Validate an optional pair of bounds.
///
/// Both absent gives the full history. Exactly one present is a
/// [`ValidationError::MissingPair`]; `from > to` is a
/// [`ValidationError::InvertedRange`].
pub fn plan_range(from: Option<i32>, to: Option<i32>) -> Result<YearRange, ValidationError> {
    match (from, to) {
        (None, None) => Ok(YearRange::All),
        (Some(_), None) | (None, Some(_)) => Err(ValidationError::MissingPair),
        (Some(from), Some(to)) if from > to => Err(ValidationError::InvertedRange { from, to }),
        (Some(from), Some(to)) => Ok(YearRange::Bounded { from, to }),
    }
}

pub fn parse_station_id(raw: &str) -> Result<StationId, ValidationError> {
    raw.trim()
        .parse::<StationId>()
        .map_err(|_| ValidationError::InvalidStationId(raw.to_string()))
}

pub fn parse_year(raw: &str) -> Result<i32, ValidationError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ValidationError::InvalidYear(raw.to_string()))
}

/// Parse then plan a range given as text.
///
/// Numbers are checked before the pairing rule, so `from=abc` alone is
/// reported as an invalid year rather than a missing pair.
pub fn parse_range(from: Option<&str>, to: Option<&str>) -> Result<YearRange, ValidationError> {
    let from = from.map(parse_year).transpose()?;
    let to = to.map(parse_year).transpose()?;
    plan_range(from, to)
}
