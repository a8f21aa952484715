//! The storage seam: an immutable query value and the trait storage implements.

use crate::range::{RawYearWindow, YearRange};
use crate::record::{RawMonthlyRecord, Station, StationId};
use std::collections::BTreeSet;

/// Which stations a monthly query covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationSelection {
    All,
    One(StationId),
    Many(BTreeSet<StationId>),
}

/// A fully specified fetch of raw monthly rows.
///
/// Built once by the constructors below and never mutated; storage
/// translates it into a single parameterized statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyQuery {
    pub stations: StationSelection,
    /// Bounds on the stored calendar year. `None` fetches every year.
    pub raw_years: Option<RawYearWindow>,
}

impl MonthlyQuery {
    /// Rows of one station covering every effective year in `range`.
    pub fn for_station(station_id: StationId, range: &YearRange) -> Self {
        MonthlyQuery {
            stations: StationSelection::One(station_id),
            raw_years: range.storage_window(),
        }
    }

    /// Rows of every station covering effective year `year`.
    pub fn for_effective_year(year: i32) -> Self {
        MonthlyQuery {
            stations: StationSelection::All,
            raw_years: YearRange::single(year).storage_window(),
        }
    }

    /// Full history of a set of stations.
    pub fn for_stations(stations: BTreeSet<StationId>) -> Self {
        MonthlyQuery {
            stations: StationSelection::Many(stations),
            raw_years: None,
        }
    }
}

/// Storage collaborator.
///
/// Row order is undefined; callers sort and group themselves.
pub trait RecordSource {
    fn fetch_monthly(&self, query: &MonthlyQuery) -> anyhow::Result<Vec<RawMonthlyRecord>>;

    fn fetch_stations(&self) -> anyhow::Result<Vec<Station>>;
}

impl<S: RecordSource + ?Sized> RecordSource for &S {
    fn fetch_monthly(&self, query: &MonthlyQuery) -> anyhow::Result<Vec<RawMonthlyRecord>> {
        (**self).fetch_monthly(query)
    }

    fn fetch_stations(&self) -> anyhow::Result<Vec<Station>> {
        (**self).fetch_stations()
    }
}
