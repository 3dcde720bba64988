//! Error types for store operations.
//!
//! Every store failure falls into one of four classes: the caller's input
//! was invalid, a primary key collided, a referenced key was absent, or the
//! store itself failed. Seed-file and hashing failures are carried
//! alongside.

use dashboard_core::ValidationError;
use dashboard_data::DataError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed or disallowed input.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A row with the same primary key already exists.
    #[error("{table}: '{key}' already exists")]
    DuplicateKey { table: String, key: String },

    /// No row with the referenced primary key.
    #[error("{table}: no row with key '{key}'")]
    NotFound { table: String, key: String },

    /// The underlying SQLite store is unavailable or failed.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A seed file could not be read or contained an invalid row.
    #[error("seed data error: {0}")]
    Data(#[from] DataError),

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hash(String),
}

impl StoreError {
    /// Returns `true` for [`StoreError::DuplicateKey`].
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StoreError::DuplicateKey { .. })
    }

    /// Returns `true` for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
