//! Error types surfaced by the query operations.

use std::fmt;

/// Generic message shown for storage faults.
pub const SOURCE_FAULT_MESSAGE: &str = "Some error occurred while retrieving records.";

/// Request input that was rejected before any data access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Station id is missing or not an integer.
    InvalidStationId(String),
    /// A year or range bound is not an integer.
    InvalidYear(String),
    /// Only one of `from`/`to` was given.
    MissingPair,
    /// `from` is greater than `to`.
    InvertedRange { from: i32, to: i32 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidStationId(raw) => write!(f, "Invalid station id: {:?}", raw),
            ValidationError::InvalidYear(raw) => write!(f, "Invalid year: {:?}", raw),
            ValidationError::MissingPair => write!(f, "Both 'from' and 'to' are required"),
            ValidationError::InvertedRange { from, to } => {
                write!(f, "'from' cannot be greater than 'to' ({} > {})", from, to)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Which side of the request is at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Client,
    Server,
}

/// Failure of one of the query operations.
#[derive(Debug)]
pub enum QueryError {
    Validation(ValidationError),
    /// Storage fault, propagated unchanged.
    Source(anyhow::Error),
}

impl QueryError {
    pub fn class(&self) -> ErrorClass {
        match self {
            QueryError::Validation(_) => ErrorClass::Client,
            QueryError::Source(_) => ErrorClass::Server,
        }
    }

    /// Message safe to show a caller. Storage detail is never included.
    pub fn user_message(&self) -> String {
        match self {
            QueryError::Validation(e) => e.to_string(),
            QueryError::Source(_) => SOURCE_FAULT_MESSAGE.to_string(),
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Validation(e) => write!(f, "Validation error: {}", e),
            QueryError::Source(e) => write!(f, "Data source error: {:#}", e),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::Validation(e) => Some(e),
            QueryError::Source(e) => Some(&**e),
        }
    }
}

impl From<ValidationError> for QueryError {
    fn from(e: ValidationError) -> Self {
        QueryError::Validation(e)
    }
}

impl From<anyhow::Error> for QueryError {
    fn from(e: anyhow::Error) -> Self {
        QueryError::Source(e)
    }
}
