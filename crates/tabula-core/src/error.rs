//! Error types for tabula-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tabula-core
#[derive(Debug, Error)]
pub enum Error {
    /// Table not found by id
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Table id already registered
    #[error("Table id already exists: {0}")]
    DuplicateTable(String),

    /// Field not found by id or name
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    /// Unrecognized rollup aggregation name
    #[error("Unknown aggregation: {0}")]
    UnknownAggregation(String),

    /// Unrecognized sort direction name
    #[error("Unknown sort direction: {0}")]
    UnknownSortDirection(String),
}
