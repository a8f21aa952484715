//! Core types and computations for hydrological gauge records.
//!
//! Monthly rows (one per station, calendar year, month and statistic) are
//! turned into yearly min/avg/max aggregates of water level, flow and
//! temperature. Everything here is pure: storage is reached only through
//! the [`source::RecordSource`] trait.
//!
//! # Pipeline
//!
//! 1. [`range`] validates the requested effective-year span and widens it
//!    by one year into the raw-year window storage filters on.
//! 2. [`normalize`] removes sentinel readings and moves November/December
//!    rows to the previous effective year.
//! 3. [`aggregate`] groups by `(station, effective year)`, cuts to the
//!    exact range, and reduces each statistic.
//!
//! [`service::HydroService`] strings these together behind the operations
//! the serving layer calls.

pub mod aggregate;
pub mod error;
pub mod normalize;
pub mod range;
pub mod record;
pub mod service;
pub mod source;

pub use error::{ErrorClass, QueryError, ValidationError};
pub use record::{NormalizedRecord, RawMonthlyRecord, Station, StationId, StatisticRole, YearlyAggregate};
pub use service::HydroService;
pub use source::{MonthlyQuery, RecordSource, StationSelection};
