//! Command implementations for the hydro CLI.
//!
//! Each subcommand maps onto one query operation of
//! [`hydro_core::HydroService`] and prints its result as JSON on stdout.

use clap::{Args, Subcommand};
use hydro_core::service::DEFAULT_REFERENCE_YEAR;
use std::path::PathBuf;

pub mod import;
pub mod records;

/// Where the records come from.
///
/// With `--db` a SQLite file is used; otherwise an in-memory database is
/// created. Either way, any CSV files given are loaded first.
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// SQLite database file
    #[arg(long, env = "HYDRO_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Station metadata CSV (`id,name,water_name,sid`)
    #[arg(long, env = "HYDRO_STATIONS_CSV", global = true)]
    pub stations_csv: Option<PathBuf>,

    /// Monthly records CSV (`station_id,year,h_month,month,type,level,flow,temperature`)
    #[arg(long, env = "HYDRO_MONTHLY_CSV", global = true)]
    pub monthly_csv: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all stations
    Stations,

    /// Normalized monthly records of a station
    Monthly {
        /// Station id
        station: String,

        /// First effective year (requires --to)
        #[arg(long)]
        from: Option<String>,

        /// Last effective year (requires --from)
        #[arg(long)]
        to: Option<String>,
    },

    /// Normalized monthly records of a station for one effective year
    MonthlyYear {
        /// Station id
        station: String,
        /// Effective year
        year: String,
    },

    /// Yearly min/avg/max statistics of a station
    Yearly {
        /// Station id
        station: String,

        /// First effective year (requires --to)
        #[arg(long)]
        from: Option<String>,

        /// Last effective year (requires --from)
        #[arg(long)]
        to: Option<String>,
    },

    /// Yearly statistics of a station for one effective year
    YearlyYear {
        /// Station id
        station: String,
        /// Effective year
        year: String,
    },

    /// Effective years with data for a station
    Years {
        /// Station id
        station: String,
    },

    /// Temperature statistics of every station with temperature data in the reference year
    WithTemperature {
        /// Effective year a station must have an average temperature in
        #[arg(long, default_value_t = DEFAULT_REFERENCE_YEAR)]
        reference_year: i32,
    },

    /// Load the CSV files into the --db database file
    Import,
}

pub fn run(data: DataArgs, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Import => import::run_import(&data),
        query => {
            let db = data.open_database()?;
            let output = records::run_query(&db, &query)?;
            println!("{}", output);
            Ok(())
        }
    }
}
