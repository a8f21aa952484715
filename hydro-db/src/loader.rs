//! CSV data loading functions for populating the database.
//!
//! Each loader parses CSV data from a string slice and upserts rows into
//! the corresponding table.
//!
//! # CSV Formats
//!
//! - **Stations** (has headers): `id,name,water_name,sid`
//! - **Monthly records** (has headers): `station_id,year,h_month,month,type,level,flow,temperature`
//!
//! Empty or non-numeric measurement fields are stored as NULL. Sentinel
//! values (`9999` levels, implausible temperatures) are stored as they are;
//! they are removed at query time by `hydro-core`.

use crate::Database;
use hydro_core::StatisticRole;
use rusqlite::params;

fn parse_field<T: std::str::FromStr>(record: &csv::StringRecord, idx: usize) -> Option<T> {
    record.get(idx).and_then(|s| s.trim().parse().ok())
}

impl Database {
    /// Load station metadata from CSV string.
    ///
    /// Expected format (with headers): `id,name,water_name,sid`
    ///
    /// # Example CSV
    /// ```text
    /// id,name,water_name,sid
    /// 150190340,Krzyżanowice,Odra,1
    /// ```
    pub fn load_stations(&self, csv_data: &str) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());
        let mut stmt = conn.prepare(
            "INSERT OR REPLACE INTO stations (id, name, water_name, sid)
             VALUES (?1, ?2, ?3, ?4)",
        )?;

        let mut count = 0u32;
        let mut skipped = 0u32;
        for result in rdr.records() {
            let r = result?;
            let Some(id) = parse_field::<i64>(&r, 0) else {
                log::warn!("[Hydro] loader: skipping station row without numeric id: {:?}", r);
                skipped += 1;
                continue;
            };
            let name = r.get(1).unwrap_or("").trim();
            let water_name = r.get(2).unwrap_or("").trim();
            let sid: Option<i64> = parse_field(&r, 3);

            stmt.execute(params![id, name, water_name, sid])?;
            count += 1;
        }
        log::info!("[Hydro] loader: Loaded {} stations, skipped {}", count, skipped);
        Ok(())
    }

    /// Load monthly records from CSV string.
    ///
    /// Expected format (with headers):
    /// `station_id,year,h_month,month,type,level,flow,temperature`
    ///
    /// Rows whose key columns (`station_id`, `year`, `month`, `type`) are
    /// missing or not numeric, or whose `type` is not 1, 2 or 3, are skipped.
    ///
    /// # Example CSV
    /// ```text
    /// station_id,year,h_month,month,type,level,flow,temperature
    /// 150190340,2006,3,12,2,214.5,61.2,2.4
    /// 150190340,2006,3,12,1,9999,40.0,
    /// ```
    pub fn load_monthly_records(&self, csv_data: &str) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());
        let mut stmt = conn.prepare(
            "INSERT OR REPLACE INTO hydro_monthly
             (station_id, year, h_month, month, type, level, flow, temperature)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;

        let mut count = 0u32;
        let mut skipped = 0u32;
        for result in rdr.records() {
            let r = result?;
            let station_id: Option<i64> = parse_field(&r, 0);
            let year: Option<i32> = parse_field(&r, 1);
            let month: Option<i32> = parse_field(&r, 3);
            let role = parse_field::<i64>(&r, 4).and_then(|code| StatisticRole::try_from(code).ok());

            let (Some(station_id), Some(year), Some(month), Some(role)) = (station_id, year, month, role)
            else {
                log::warn!("[Hydro] loader: skipping monthly row with invalid key columns: {:?}", r);
                skipped += 1;
                continue;
            };

            let h_month: Option<i32> = parse_field(&r, 2);
            let level: Option<f64> = parse_field(&r, 5);
            let flow: Option<f64> = parse_field(&r, 6);
            let temperature: Option<f64> = parse_field(&r, 7);

            stmt.execute(params![
                station_id,
                year,
                h_month,
                month,
                role.code(),
                level,
                flow,
                temperature
            ])?;
            count += 1;
        }
        log::info!(
            "[Hydro] loader: Loaded {} monthly records, skipped {} invalid",
            count,
            skipped
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    const MONTHLY_HEADER: &str = "station_id,year,h_month,month,type,level,flow,temperature\n";

    fn count(db: &Database, sql: &str) -> i64 {
        db.conn.borrow().query_row(sql, [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn load_stations_from_csv() {
        let db = Database::new().unwrap();
        let csv = "\
id,name,water_name,sid
150190340,Krzyżanowice,Odra,1
150180060,Racibórz-Miedonia,Odra,2
";
        db.load_stations(csv).unwrap();
        assert_eq!(count(&db, "SELECT COUNT(*) FROM stations"), 2);

        let name: String = db
            .conn
            .borrow()
            .query_row("SELECT name FROM stations WHERE id = 150180060", [], |row| row.get(0))
            .unwrap();
        assert_eq!(name, "Racibórz-Miedonia");
    }

    #[test]
    fn load_stations_replaces_on_conflict() {
        let db = Database::new().unwrap();
        db.load_stations("id,name,water_name,sid\n1,Opole,Odra,1\n").unwrap();
        db.load_stations("id,name,water_name,sid\n1,Opole Updated,Odra,1\n").unwrap();
        assert_eq!(count(&db, "SELECT COUNT(*) FROM stations"), 1, "Should have 1 row after upsert");
        let name: String = db
            .conn
            .borrow()
            .query_row("SELECT name FROM stations WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(name, "Opole Updated");
    }

    #[test]
    fn load_stations_skips_non_numeric_id() {
        let db = Database::new().unwrap();
        db.load_stations("id,name,water_name,sid\nabc,Opole,Odra,1\n2,Brzeg,Odra,\n")
            .unwrap();
        assert_eq!(count(&db, "SELECT COUNT(*) FROM stations"), 1);
    }

    #[test]
    fn load_monthly_records_from_csv() {
        let db = Database::new().unwrap();
        let csv = format!(
            "{}{}",
            MONTHLY_HEADER,
            "\
1,2006,3,12,1,200.0,40.0,1.5
1,2006,3,12,2,214.5,61.2,2.4
1,2006,3,12,3,230.0,90.0,3.1
"
        );
        db.load_monthly_records(&csv).unwrap();
        assert_eq!(count(&db, "SELECT COUNT(*) FROM hydro_monthly"), 3);

        let flow: f64 = db
            .conn
            .borrow()
            .query_row(
                "SELECT flow FROM hydro_monthly WHERE station_id = 1 AND type = 2",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!((flow - 61.2).abs() < 1e-9);
    }

    #[test]
    fn load_monthly_records_stores_empty_fields_as_null() {
        let db = Database::new().unwrap();
        let csv = format!("{}1,2006,,12,2,,,\n", MONTHLY_HEADER);
        db.load_monthly_records(&csv).unwrap();
        let (h_month, level, temperature): (Option<i32>, Option<f64>, Option<f64>) = db
            .conn
            .borrow()
            .query_row(
                "SELECT h_month, level, temperature FROM hydro_monthly",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert!(h_month.is_none());
        assert!(level.is_none());
        assert!(temperature.is_none());
    }

    #[test]
    fn load_monthly_records_keeps_sentinels_raw() {
        let db = Database::new().unwrap();
        let csv = format!("{}1,2006,3,12,2,9999,1.0,77.0\n", MONTHLY_HEADER);
        db.load_monthly_records(&csv).unwrap();
        assert_eq!(
            count(&db, "SELECT COUNT(*) FROM hydro_monthly WHERE level = 9999 AND temperature = 77"),
            1
        );
    }

    #[test]
    fn load_monthly_records_skips_invalid_keys() {
        let db = Database::new().unwrap();
        let csv = format!(
            "{}{}",
            MONTHLY_HEADER,
            "\
x,2006,3,12,2,1.0,1.0,1.0
1,----,3,12,2,1.0,1.0,1.0
1,2006,3,12,7,1.0,1.0,1.0
1,2006,3,,2,1.0,1.0,1.0
1,2006,3,12,2,1.0,1.0,1.0
"
        );
        db.load_monthly_records(&csv).unwrap();
        assert_eq!(
            count(&db, "SELECT COUNT(*) FROM hydro_monthly"),
            1,
            "Should only load rows with valid key columns"
        );
    }
}
