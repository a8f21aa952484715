//! Query operations exposed to the serving layer.
//!
//! Every operation takes its inputs as text, validates them before touching
//! storage, and reports failure as a [`QueryError`]. A valid query that
//! matches nothing is an empty success.

use crate::aggregate::{aggregate_for, aggregate_in_range, has_avg_temperature, narrow_stations};
use crate::error::QueryError;
use crate::normalize::Normalize;
use crate::range::{parse_range, parse_station_id, parse_year, YearRange};
use crate::record::{NormalizedRecord, Station, StationId, YearlyAggregate};
use crate::source::{MonthlyQuery, RecordSource};

/// Reference year used by the dashboard's temperature overview.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2000;

/// Query operations over a [`RecordSource`].
#[derive(Debug, Clone)]
pub struct HydroService<S> {
    source: S,
}

impl<S: RecordSource> HydroService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Normalized monthly rows of one station, optionally limited to an
    /// effective-year range. One output row per stored row.
    pub fn monthly_records(
        &self,
        station: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<NormalizedRecord>, QueryError> {
        let station_id = parse_station_id(station)?;
        let range = parse_range(from, to)?;
        self.normalized_in_range(station_id, &range)
    }

    /// Normalized monthly rows of one station for a single effective year.
    pub fn monthly_records_for_year(
        &self,
        station: &str,
        year: &str,
    ) -> Result<Vec<NormalizedRecord>, QueryError> {
        let station_id = parse_station_id(station)?;
        let year = parse_year(year)?;
        self.normalized_in_range(station_id, &YearRange::single(year))
    }

    /// Yearly aggregates of one station, ordered by effective year.
    pub fn yearly_aggregates(
        &self,
        station: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<YearlyAggregate>, QueryError> {
        let station_id = parse_station_id(station)?;
        let range = parse_range(from, to)?;
        let rows = self
            .source
            .fetch_monthly(&MonthlyQuery::for_station(station_id, &range))?;
        let out = aggregate_in_range(&rows, &range);
        log::info!(
            "service: yearly_aggregates for station {} returned {} records",
            station_id,
            out.len()
        );
        Ok(out)
    }

    /// Aggregate of one station for one effective year, `None` when the
    /// station has no rows attributed to that year.
    pub fn yearly_aggregate_for_year(
        &self,
        station: &str,
        year: &str,
    ) -> Result<Option<YearlyAggregate>, QueryError> {
        let station_id = parse_station_id(station)?;
        let range = YearRange::single(parse_year(year)?);
        let rows = self
            .source
            .fetch_monthly(&MonthlyQuery::for_station(station_id, &range))?;
        Ok(aggregate_in_range(&rows, &range).into_iter().next())
    }

    /// Temperature aggregates, over all years, of the stations that have an
    /// average temperature in `reference_year`.
    ///
    /// Years without an average temperature are left out for every
    /// station, including years other than the reference year.
    pub fn stations_with_reference_year_temperature(
        &self,
        reference_year: i32,
    ) -> Result<Vec<YearlyAggregate>, QueryError> {
        let reference_rows = self
            .source
            .fetch_monthly(&MonthlyQuery::for_effective_year(reference_year))?;
        let stations = narrow_stations(&reference_rows, reference_year);
        log::debug!(
            "service: {} stations have temperature in {}",
            stations.len(),
            reference_year
        );
        if stations.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .source
            .fetch_monthly(&MonthlyQuery::for_stations(stations.clone()))?;
        let out: Vec<YearlyAggregate> = aggregate_for(&stations, &rows)
            .iter()
            .filter(|a| has_avg_temperature(a))
            .map(YearlyAggregate::temperature_only)
            .collect();
        log::info!(
            "service: stations_with_reference_year_temperature returned {} records",
            out.len()
        );
        Ok(out)
    }

    /// Ascending effective years for which the station has any rows.
    pub fn available_years(&self, station: &str) -> Result<Vec<i32>, QueryError> {
        Ok(self
            .yearly_aggregates(station, None, None)?
            .into_iter()
            .map(|a| a.year)
            .collect())
    }

    pub fn stations(&self) -> Result<Vec<Station>, QueryError> {
        Ok(self.source.fetch_stations()?)
    }

    fn normalized_in_range(
        &self,
        station_id: StationId,
        range: &YearRange,
    ) -> Result<Vec<NormalizedRecord>, QueryError> {
        let rows = self
            .source
            .fetch_monthly(&MonthlyQuery::for_station(station_id, range))?;
        let out: Vec<NormalizedRecord> = rows
            .iter()
            .map(Normalize::normalize)
            .filter(|r| range.contains(r.year))
            .collect();
        log::info!(
            "service: monthly records for station {} returned {} records",
            station_id,
            out.len()
        );
        Ok(out)
    }
}
