//! Error types for registry reporting.

use thiserror::Error;

/// Errors that can occur while configuring or rendering a report.
///
/// Recording and querying never fail; these only arise on the reporting
/// surface.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to write the rendered report
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize or parse JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unrecognized report format name
    #[error("Invalid report format: {0}")]
    InvalidFormat(String),

    /// Unrecognized time unit name
    #[error("Invalid time unit: {0}")]
    InvalidUnit(String),

    /// Unrecognized sort key name
    #[error("Invalid sort key: {0}")]
    InvalidSortKey(String),

    /// Row limit that is not a positive integer
    #[error("Invalid row limit: {0}")]
    InvalidLimit(String),
}

/// Result type for reporting operations.
pub type ReportResult<T> = Result<T, ReportError>;
