//! Record types shared by the storage layer, the aggregation engine and
//! the command layer.
//!
//! Output structs derive `Serialize` with camelCase keys so they can be
//! handed to the dashboard as JSON unchanged.

use serde::{Serialize, Serializer};
use std::fmt;

/// Numeric identifier of a gauge station.
pub type StationId = i64;

/// Which monthly statistic a stored row carries, encoded in the `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatisticRole {
    Min = 1,
    Avg = 2,
    Max = 3,
}

impl StatisticRole {
    /// The integer code used by storage.
    pub fn code(self) -> i64 {
        self as i64
    }
}

/// Raised when a stored `type` code is not one of 1, 2 or 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownStatisticRole(pub i64);

impl fmt::Display for UnknownStatisticRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown statistic type code: {}", self.0)
    }
}

impl std::error::Error for UnknownStatisticRole {}

impl TryFrom<i64> for StatisticRole {
    type Error = UnknownStatisticRole;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(StatisticRole::Min),
            2 => Ok(StatisticRole::Avg),
            3 => Ok(StatisticRole::Max),
            other => Err(UnknownStatisticRole(other)),
        }
    }
}

impl Serialize for StatisticRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.code())
    }
}

/// One stored row: a single statistic for one station, calendar year and month.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMonthlyRecord {
    pub station_id: StationId,
    /// Calendar year as stored, before year correction.
    pub year: i32,
    /// Secondary month index kept by the upstream tables. Carries no meaning here.
    pub hydro_month: Option<i32>,
    pub month: i32,
    pub role: StatisticRole,
    /// Water level; `9999` marks a missing reading.
    pub level: Option<f64>,
    pub flow: Option<f64>,
    /// Water temperature; anything above 50 is an instrument fault.
    pub temperature: Option<f64>,
}

/// A monthly row after sentinel removal and year correction.
///
/// `year` is always the effective year. The station linkage and the
/// secondary month index are gone; callers already know the station.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    pub year: i32,
    pub month: i32,
    #[serde(rename = "type")]
    pub role: StatisticRole,
    pub level: Option<f64>,
    pub flow: Option<f64>,
    pub temperature: Option<f64>,
}

/// Station metadata, passed through from storage untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub water_name: String,
    pub sid: Option<i64>,
}

/// A present output value, fixed to two decimal places.
///
/// Serializes as a string (`"12.30"`) so consumers never see floating
/// point noise.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Fixed2(f64);

impl Fixed2 {
    /// Round `value` to two decimals. Non-finite input yields `None`.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() {
            Some(Fixed2((value * 100.0).round() / 100.0))
        } else {
            None
        }
    }
}

impl fmt::Display for Fixed2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Fixed2 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Yearly min/avg/max of level, flow and temperature for one station.
///
/// Every field is always present in the serialized shape; an absent
/// statistic is `null`, never `0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyAggregate {
    pub station_id: StationId,
    /// Effective year.
    pub year: i32,
    pub min_level: Option<Fixed2>,
    pub avg_level: Option<Fixed2>,
    pub max_level: Option<Fixed2>,
    pub min_flow: Option<Fixed2>,
    pub avg_flow: Option<Fixed2>,
    pub max_flow: Option<Fixed2>,
    pub min_temperature: Option<Fixed2>,
    pub avg_temperature: Option<Fixed2>,
    pub max_temperature: Option<Fixed2>,
}

impl YearlyAggregate {
    /// An aggregate with every statistic absent.
    pub fn empty(station_id: StationId, year: i32) -> Self {
        YearlyAggregate {
            station_id,
            year,
            min_level: None,
            avg_level: None,
            max_level: None,
            min_flow: None,
            avg_flow: None,
            max_flow: None,
            min_temperature: None,
            avg_temperature: None,
            max_temperature: None,
        }
    }

    /// Copy keeping only the temperature statistics.
    pub fn temperature_only(&self) -> Self {
        YearlyAggregate {
            min_temperature: self.min_temperature,
            avg_temperature: self.avg_temperature,
            max_temperature: self.max_temperature,
            ..YearlyAggregate::empty(self.station_id, self.year)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistic_role_round_trips_codes() {
        assert_eq!(StatisticRole::try_from(1), Ok(StatisticRole::Min));
        assert_eq!(StatisticRole::try_from(2), Ok(StatisticRole::Avg));
        assert_eq!(StatisticRole::try_from(3), Ok(StatisticRole::Max));
        assert_eq!(StatisticRole::Max.code(), 3);
    }

    #[test]
    fn statistic_role_rejects_unknown_code() {
        assert_eq!(StatisticRole::try_from(4), Err(UnknownStatisticRole(4)));
        assert_eq!(StatisticRole::try_from(0), Err(UnknownStatisticRole(0)));
    }

    #[test]
    fn fixed2_rounds_and_formats() {
        let v = Fixed2::new(12.345_678).unwrap();
        assert_eq!(v.to_string(), "12.35");
        assert_eq!(Fixed2::new(3.0).unwrap().to_string(), "3.00");
        assert_eq!(Fixed2::new(-0.126).unwrap().to_string(), "-0.13");
    }

    #[test]
    fn fixed2_rejects_non_finite() {
        assert!(Fixed2::new(f64::NAN).is_none());
        assert!(Fixed2::new(f64::INFINITY).is_none());
    }

    #[test]
    fn yearly_aggregate_serializes_nulls_and_strings() {
        let mut agg = YearlyAggregate::empty(7, 2001);
        agg.avg_level = Fixed2::new(101.5);
        let json = serde_json::to_value(&agg).unwrap();
        assert_eq!(json["stationId"], 7);
        assert_eq!(json["year"], 2001);
        assert_eq!(json["avgLevel"], "101.50");
        assert!(json["minLevel"].is_null());
        assert!(json["maxTemperature"].is_null());
        assert_eq!(json.as_object().unwrap().len(), 11, "all nine statistics plus keys");
    }

    #[test]
    fn temperature_only_clears_level_and_flow() {
        let mut agg = YearlyAggregate::empty(1, 2000);
        agg.min_level = Fixed2::new(1.0);
        agg.avg_flow = Fixed2::new(2.0);
        agg.avg_temperature = Fixed2::new(9.5);
        let t = agg.temperature_only();
        assert!(t.min_level.is_none());
        assert!(t.avg_flow.is_none());
        assert_eq!(t.avg_temperature, Fixed2::new(9.5));
        assert_eq!((t.station_id, t.year), (1, 2000));
    }

    #[test]
    fn normalized_record_serializes_role_as_type_code() {
        let rec = NormalizedRecord {
            year: 1999,
            month: 12,
            role: StatisticRole::Avg,
            level: None,
            flow: Some(3.5),
            temperature: Some(4.0),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], 2);
        assert_eq!(json["year"], 1999);
        assert!(json["level"].is_null());
        assert!(json.get("stationId").is_none());
    }
}
