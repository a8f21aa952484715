//! Yearly aggregation of monthly records.
//!
//! Each stored row carries one statistic (min, avg or max) for one month.
//! A yearly aggregate takes, per effective year and per measured quantity,
//! the lowest of the monthly minimums, the mean of the monthly averages and
//! the highest of the monthly maximums. Sentinels are removed first, so an
//! invalid reading never reaches a reduction; a statistic with no valid
//! input stays `None`.

use crate::normalize::Normalize;
use crate::range::YearRange;
use crate::record::{Fixed2, NormalizedRecord, RawMonthlyRecord, StationId, StatisticRole, YearlyAggregate};
use std::collections::{BTreeMap, BTreeSet};

/// Reduction state for one quantity within one group.
#[derive(Debug, Default, Clone, Copy)]
struct QuantityStats {
    min: Option<f64>,
    avg_sum: f64,
    avg_count: u32,
    max: Option<f64>,
}

impl QuantityStats {
    fn push(&mut self, role: StatisticRole, value: Option<f64>) {
        let Some(v) = value else {
            return;
        };
        match role {
            StatisticRole::Min => self.min = Some(self.min.map_or(v, |m| m.min(v))),
            StatisticRole::Max => self.max = Some(self.max.map_or(v, |m| m.max(v))),
            StatisticRole::Avg => {
                self.avg_sum += v;
                self.avg_count += 1;
            }
        }
    }

    fn min(&self) -> Option<Fixed2> {
        self.min.and_then(Fixed2::new)
    }

    fn avg(&self) -> Option<Fixed2> {
        if self.avg_count == 0 {
            None
        } else {
            Fixed2::new(self.avg_sum / f64::from(self.avg_count))
        }
    }

    fn max(&self) -> Option<Fixed2> {
        self.max.and_then(Fixed2::new)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct GroupStats {
    level: QuantityStats,
    flow: QuantityStats,
    temperature: QuantityStats,
}

impl GroupStats {
    fn push(&mut self, record: &NormalizedRecord) {
        self.level.push(record.role, record.level);
        self.flow.push(record.role, record.flow);
        self.temperature.push(record.role, record.temperature);
    }

    fn finish(&self, station_id: StationId, year: i32) -> YearlyAggregate {
        YearlyAggregate {
            station_id,
            year,
            min_level: self.level.min(),
            avg_level: self.level.avg(),
            max_level: self.level.max(),
            min_flow: self.flow.min(),
            avg_flow: self.flow.avg(),
            max_flow: self.flow.max(),
            min_temperature: self.temperature.min(),
            avg_temperature: self.temperature.avg(),
            max_temperature: self.temperature.max(),
        }
    }
}

/// Aggregate raw rows into one record per `(station, effective year)`.
///
/// Output is ordered by station id, then year.
pub fn aggregate(rows: &[RawMonthlyRecord]) -> Vec<YearlyAggregate> {
    aggregate_in_range(rows, &YearRange::All)
}

/// Like [`aggregate`], keeping only groups whose effective year is in `range`.
///
/// The range test runs after year correction, so a December row stored one
/// year past `to` still lands in `to`.
pub fn aggregate_in_range(rows: &[RawMonthlyRecord], range: &YearRange) -> Vec<YearlyAggregate> {
    let mut groups: BTreeMap<(StationId, i32), GroupStats> = BTreeMap::new();
    for row in rows {
        let record = row.normalize();
        if !range.contains(record.year) {
            continue;
        }
        groups
            .entry((row.station_id, record.year))
            .or_default()
            .push(&record);
    }
    log::debug!(
        "aggregate: {} rows reduced to {} yearly groups",
        rows.len(),
        groups.len()
    );
    groups
        .into_iter()
        .map(|((station_id, year), stats)| stats.finish(station_id, year))
        .collect()
}

/// Predicate shared by both passes of the reference-year query.
pub fn has_avg_temperature(aggregate: &YearlyAggregate) -> bool {
    aggregate.avg_temperature.is_some()
}

/// First pass: stations whose aggregate for `reference_year` has an
/// average temperature.
pub fn narrow_stations(rows: &[RawMonthlyRecord], reference_year: i32) -> BTreeSet<StationId> {
    aggregate_in_range(rows, &YearRange::single(reference_year))
        .into_iter()
        .filter(has_avg_temperature)
        .map(|a| a.station_id)
        .collect()
}

/// Second pass: full yearly aggregates, over every year, for `stations` only.
pub fn aggregate_for(stations: &BTreeSet<StationId>, rows: &[RawMonthlyRecord]) -> Vec<YearlyAggregate> {
    let selected: Vec<RawMonthlyRecord> = rows
        .iter()
        .filter(|r| stations.contains(&r.station_id))
        .cloned()
        .collect();
    aggregate(&selected)
}
