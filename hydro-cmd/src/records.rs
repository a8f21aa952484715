//! Query subcommands: open the data source, run the operation, render JSON.

use crate::{Command, DataArgs};
use hydro_core::{ErrorClass, HydroService, QueryError};
use hydro_db::Database;
use serde::Serialize;

impl DataArgs {
    /// Open the configured database and load any CSV files given.
    pub fn open_database(&self) -> anyhow::Result<Database> {
        let db = match &self.db {
            Some(path) => Database::open(path)?,
            None => Database::new()?,
        };
        if let Some(path) = &self.stations_csv {
            log::info!("Loading stations from {}", path.display());
            db.load_stations(&std::fs::read_to_string(path)?)?;
        }
        if let Some(path) = &self.monthly_csv {
            log::info!("Loading monthly records from {}", path.display());
            db.load_monthly_records(&std::fs::read_to_string(path)?)?;
        }
        if self.db.is_none() && self.monthly_csv.is_none() {
            log::warn!("No --db or --monthly-csv given; querying an empty database");
        }
        Ok(db)
    }
}

/// Pretty JSON on success.
///
/// Validation failures become an error carrying their message. Storage
/// faults are logged in full and reported with the generic message only.
pub fn render<T: Serialize>(result: Result<T, QueryError>) -> anyhow::Result<String> {
    match result {
        Ok(value) => Ok(serde_json::to_string_pretty(&value)?),
        Err(e) => {
            match e.class() {
                ErrorClass::Client => log::warn!("Rejected request: {}", e),
                ErrorClass::Server => log::error!("{:#}", e),
            }
            anyhow::bail!(e.user_message())
        }
    }
}

/// Run one query subcommand against `db` and return the rendered output.
pub fn run_query(db: &Database, command: &Command) -> anyhow::Result<String> {
    let service = HydroService::new(db);
    match command {
        Command::Stations => render(service.stations()),
        Command::Monthly { station, from, to } => {
            render(service.monthly_records(station, from.as_deref(), to.as_deref()))
        }
        Command::MonthlyYear { station, year } => {
            render(service.monthly_records_for_year(station, year))
        }
        Command::Yearly { station, from, to } => {
            render(service.yearly_aggregates(station, from.as_deref(), to.as_deref()))
        }
        // Zero or one element, so callers always receive an array.
        Command::YearlyYear { station, year } => render(
            service
                .yearly_aggregate_for_year(station, year)
                .map(|found| found.into_iter().collect::<Vec<_>>()),
        ),
        Command::Years { station } => render(service.available_years(station)),
        Command::WithTemperature { reference_year } => {
            render(service.stations_with_reference_year_temperature(*reference_year))
        }
        Command::Import => anyhow::bail!("import is not a query"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydro_core::error::SOURCE_FAULT_MESSAGE;

    fn sample_db() -> Database {
        let db = Database::new().unwrap();
        db.load_stations("id,name,water_name,sid\n1,Krzyżanowice,Odra,1\n")
            .unwrap();
        db.load_monthly_records(
            "\
station_id,year,h_month,month,type,level,flow,temperature
1,2000,6,3,2,120.0,11.0,6.0
1,2006,3,12,2,140.456,13.0,2.0
",
        )
        .unwrap();
        db
    }

    fn json(db: &Database, command: Command) -> serde_json::Value {
        serde_json::from_str(&run_query(db, &command).unwrap()).unwrap()
    }

    #[test]
    fn yearly_renders_fixed_strings() {
        let db = sample_db();
        let out = json(
            &db,
            Command::Yearly {
                station: "1".to_string(),
                from: Some("2000".to_string()),
                to: Some("2005".to_string()),
            },
        );
        let rows = out.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["year"], 2005);
        assert_eq!(rows[1]["avgLevel"], "140.46");
        assert!(rows[1]["minLevel"].is_null());
    }

    #[test]
    fn yearly_year_is_always_an_array() {
        let db = sample_db();
        let found = json(
            &db,
            Command::YearlyYear {
                station: "1".to_string(),
                year: "2000".to_string(),
            },
        );
        assert_eq!(found.as_array().unwrap().len(), 1);
        let missing = json(
            &db,
            Command::YearlyYear {
                station: "1".to_string(),
                year: "2001".to_string(),
            },
        );
        assert!(missing.as_array().unwrap().is_empty());
    }

    #[test]
    fn years_and_stations() {
        let db = sample_db();
        let years = json(&db, Command::Years { station: "1".to_string() });
        assert_eq!(years, serde_json::json!([2000, 2005]));
        let stations = json(&db, Command::Stations);
        assert_eq!(stations[0]["waterName"], "Odra");
    }

    #[test]
    fn validation_error_message_is_surfaced() {
        let db = sample_db();
        let err = run_query(
            &db,
            &Command::Yearly {
                station: "1".to_string(),
                from: Some("2005".to_string()),
                to: None,
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Both 'from' and 'to' are required");
    }

    #[test]
    fn source_fault_message_is_generic() {
        let err = render::<Vec<i32>>(Err(QueryError::Source(anyhow::anyhow!(
            "disk I/O error at /var/lib/hydro.sqlite"
        ))))
        .unwrap_err();
        assert_eq!(err.to_string(), SOURCE_FAULT_MESSAGE);
    }

    #[test]
    fn open_database_loads_csv_files() {
        let dir = std::env::temp_dir().join(format!("hydro-cmd-open-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let stations = dir.join("stations.csv");
        let monthly = dir.join("monthly.csv");
        std::fs::write(&stations, "id,name,water_name,sid\n9,Brzeg,Odra,3\n").unwrap();
        std::fs::write(
            &monthly,
            "station_id,year,h_month,month,type,level,flow,temperature\n9,2001,1,1,2,1,2,3\n",
        )
        .unwrap();

        let data = DataArgs {
            db: None,
            stations_csv: Some(stations),
            monthly_csv: Some(monthly),
        };
        let db = data.open_database().unwrap();
        let years = json(&db, Command::Years { station: "9".to_string() });
        assert_eq!(years, serde_json::json!([2001]));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
