//! Typed query methods for retrieving monthly records and stations.
//!
//! Storage knows nothing about effective years: it filters on the stored
//! calendar year only, using the window `hydro-core` already widened.

use crate::Database;
use hydro_core::range::RawYearWindow;
use hydro_core::{MonthlyQuery, RawMonthlyRecord, RecordSource, Station, StationId, StationSelection, StatisticRole};
use rusqlite::params;
use rusqlite::types::Type;

/// JSON array of station ids bound into `json_each`, `None` for all stations.
fn station_filter(selection: &StationSelection) -> anyhow::Result<Option<String>> {
    let ids: Vec<StationId> = match selection {
        StationSelection::All => return Ok(None),
        StationSelection::One(id) => vec![*id],
        StationSelection::Many(ids) => ids.iter().copied().collect(),
    };
    Ok(Some(serde_json::to_string(&ids)?))
}

impl Database {
    /// Get the raw monthly rows matching `query`.
    ///
    /// The station set travels as one JSON parameter and the year bounds as
    /// nullable parameters, so every query shape runs the same statement.
    pub fn query_monthly(&self, query: &MonthlyQuery) -> anyhow::Result<Vec<RawMonthlyRecord>> {
        let stations = station_filter(&query.stations)?;
        let (year_from, year_to) = match query.raw_years {
            Some(RawYearWindow { from, to }) => (Some(from), Some(to)),
            None => (None, None),
        };

        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT station_id, year, h_month, month, type, level, flow, temperature
             FROM hydro_monthly
             WHERE (?1 IS NULL OR station_id IN (SELECT value FROM json_each(?1)))
               AND (?2 IS NULL OR year >= ?2)
               AND (?3 IS NULL OR year <= ?3)
             ORDER BY station_id, year, month, type",
        )?;
        let rows = stmt
            .query_map(params![stations, year_from, year_to], |row| {
                let code: i64 = row.get(4)?;
                let role = StatisticRole::try_from(code).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(4, Type::Integer, Box::new(e))
                })?;
                Ok(RawMonthlyRecord {
                    station_id: row.get(0)?,
                    year: row.get(1)?,
                    hydro_month: row.get(2)?,
                    month: row.get(3)?,
                    role,
                    level: row.get(5)?,
                    flow: row.get(6)?,
                    temperature: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[Hydro] query: query_monthly({:?}, {:?}) returned {} records",
            query.stations,
            query.raw_years,
            rows.len()
        );
        Ok(rows)
    }

    /// Get list of all stations, ordered by id.
    pub fn query_stations(&self) -> anyhow::Result<Vec<Station>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT id, name, water_name, sid FROM stations
             ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Station {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    water_name: row.get(2)?,
                    sid: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("[Hydro] query: query_stations returned {} records", rows.len());
        Ok(rows)
    }
}

impl RecordSource for Database {
    fn fetch_monthly(&self, query: &MonthlyQuery) -> anyhow::Result<Vec<RawMonthlyRecord>> {
        self.query_monthly(query)
    }

    fn fetch_stations(&self) -> anyhow::Result<Vec<Station>> {
        self.query_stations()
    }
}
