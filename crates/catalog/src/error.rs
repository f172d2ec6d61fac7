//! Error types for the catalog crate.

use thiserror::Error;

/// Errors that can occur while loading and validating a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A catalog file is missing from the data directory
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A catalog file is not valid JSON for its record type
    #[error("Parse error in {file} at line {line}, column {column}: {reason}")]
    Parse {
        file: String,
        line: usize,
        column: usize,
        reason: String,
    },

    /// A record field had an invalid value
    #[error("Invalid value for {field} on {entity} {id}: {value}")]
    InvalidValue {
        entity: String,
        id: u32,
        field: String,
        value: String,
    },

    /// Two records of the same kind share an id
    #[error("Duplicate {entity} id {id}")]
    DuplicateId { entity: String, id: u32 },

    /// A record points at an id that does not exist (e.g. a job in an
    /// unknown category)
    #[error("Missing reference: {entity} with id {id} (referenced by {referenced_by})")]
    MissingReference {
        entity: String,
        id: u32,
        referenced_by: String,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
