//! Per-call connections to the store file.
//!
//! [`ConnectionProvider`] hands out a fresh handle for every operation and
//! never keeps one open between calls. Work that needs a handle goes
//! through [`ConnectionProvider::with_unit_of_work`], which commits when the
//! closure succeeds and rolls back otherwise; the handle is closed when it
//! goes out of scope on every path.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, Transaction};
use tracing::trace;

use crate::error::Result;

/// Opens short-lived connections to a single SQLite file.
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    path: PathBuf,
}

impl ConnectionProvider {
    /// Creates a provider for the store file at `path`.
    ///
    /// Nothing is opened until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens an independent handle with foreign-key enforcement enabled.
    ///
    /// The file is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`](crate::StoreError::Storage) if the
    /// file cannot be opened.
    pub fn open_connection(&self) -> Result<Connection> {
        trace!(path = %self.path.display(), "opening store connection");
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Runs `work` inside a transaction on a fresh connection.
    ///
    /// Commits if `work` returns `Ok`, rolls back if it returns `Err` (or
    /// unwinds). The connection is closed before this returns.
    pub fn with_unit_of_work<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.open_connection()?;
        let tx = conn.transaction()?;
        let value = work(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}
