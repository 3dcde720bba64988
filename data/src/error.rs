//! Error types for seed-file and configuration loading.

use thiserror::Error;

/// Errors that can occur while reading seed files or configuration.
#[derive(Debug, Error)]
pub enum DataError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed CSV (bad quoting, inconsistent column count, ...).
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A row that cannot be turned into a record.
    #[error("{path}, line {line}: {source}")]
    InvalidRow {
        path: String,
        line: u64,
        #[source]
        source: dashboard_core::ValidationError,
    },
}

/// Convenience alias for results with [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;
