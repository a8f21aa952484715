//! SQLite storage layer for monthly hydrological gauge records.
//!
//! This crate owns the relational side of the toolkit: it creates the
//! schema, loads CSV exports into it, and answers the immutable
//! [`MonthlyQuery`](hydro_core::MonthlyQuery) values produced by
//! `hydro-core`. All year correction and aggregation stays in the core;
//! storage only filters on the stored calendar year.
//!
//! # Usage
//!
//! ```rust
//! use hydro_core::HydroService;
//! use hydro_db::Database;
//!
//! let db = Database::new().unwrap();
//! db.load_stations("id,name,water_name,sid\n150190340,Krzyżanowice,Odra,1\n").unwrap();
//! db.load_monthly_records(
//!     "station_id,year,h_month,month,type,level,flow,temperature\n\
//!      150190340,2006,3,12,2,214.5,61.2,2.4\n",
//! )
//! .unwrap();
//!
//! let service = HydroService::new(&db);
//! let yearly = service.yearly_aggregates("150190340", None, None).unwrap();
//! assert_eq!(yearly[0].year, 2005);
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.
//! - `stations` - Station metadata
//! - `hydro_monthly` - One row per station, calendar year, month and statistic type

pub mod schema;
mod loader;
mod queries;

use rusqlite::Connection;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// SQLite database holding station metadata and monthly records.
///
/// Cheaply cloneable (via `Rc`); clones share one connection.
///
/// # Example
///
/// ```rust
/// use hydro_db::Database;
///
/// let db = Database::new().unwrap();
/// db.load_stations("id,name,water_name,sid\n1,Racibórz-Miedonia,Odra,2\n").unwrap();
/// let stations = db.query_stations().unwrap();
/// assert_eq!(stations.len(), 1);
/// ```
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    ///
    /// The database is empty after creation; use the `load_*` methods
    /// to populate it with CSV data.
    pub fn new() -> anyhow::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Open (or create) a database file and make sure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        log::info!("[Hydro] db: opening {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}
