//! SQL schema definitions.
//!
//! Applied as a single batch whenever a database is opened. Every statement
//! uses `IF NOT EXISTS`, so opening an existing file is safe.

/// Returns the full SQL schema as a single batch string.
///
/// - `stations` - Station metadata (id, name, river name, secondary id)
/// - `hydro_monthly` - Monthly records; `type` is 1 = min, 2 = avg, 3 = max.
///   `year` is the calendar year as measured, before any correction.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS stations (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        water_name TEXT NOT NULL,
        sid INTEGER
    );

    CREATE TABLE IF NOT EXISTS hydro_monthly (
        station_id INTEGER NOT NULL,
        year INTEGER NOT NULL,
        h_month INTEGER,
        month INTEGER NOT NULL,
        type INTEGER NOT NULL CHECK (type IN (1, 2, 3)),
        level REAL,
        flow REAL,
        temperature REAL,
        PRIMARY KEY (station_id, year, month, type)
    );
    CREATE INDEX IF NOT EXISTS idx_monthly_station ON hydro_monthly(station_id);
    CREATE INDEX IF NOT EXISTS idx_monthly_year ON hydro_monthly(year);
    "#
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn count_objects(conn: &Connection, kind: &str, name: &str) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = ?1 AND name = ?2",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn schema_is_valid_sql() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema())
            .expect("Schema SQL should be valid");
    }

    #[test]
    fn schema_creates_tables_and_indexes() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();

        for table in ["stations", "hydro_monthly"] {
            assert_eq!(count_objects(&conn, "table", table), 1, "Table '{}' should exist", table);
        }
        for idx in ["idx_monthly_station", "idx_monthly_year"] {
            assert_eq!(count_objects(&conn, "index", idx), 1, "Index '{}' should exist", idx);
        }
    }

    #[test]
    fn schema_rejects_unknown_type_code() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();
        let result = conn.execute(
            "INSERT INTO hydro_monthly (station_id, year, month, type) VALUES (1, 2000, 1, 4)",
            [],
        );
        assert!(result.is_err(), "type 4 violates the CHECK constraint");
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();
        conn.execute_batch(create_schema())
            .expect("Applying schema twice should succeed due to IF NOT EXISTS");
    }
}
