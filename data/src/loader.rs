//! CSV seed-file reading.
//!
//! A seed file is a CSV whose header row names the target table's columns.
//! [`SeedFile`] reads it lazily, one record at a time, so a caller inserting
//! rows as they arrive keeps everything before the first bad row.
//!
//! # Example
//!
//! ```no_run
//! use dashboard_core::Incident;
//! use dashboard_data::SeedFile;
//!
//! let mut file = SeedFile::open("DATA/cyber_incidents.csv").unwrap();
//! for incident in file.records::<Incident>() {
//!     let incident = incident.unwrap();
//!     println!("{} [{}]", incident.incident_id, incident.severity);
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use dashboard_core::{Record, coerce_text_row};
use tracing::debug;

use crate::error::{DataError, Result};

/// An open CSV seed file.
pub struct SeedFile {
    path: PathBuf,
    reader: csv::Reader<File>,
    headers: Vec<String>,
}

impl SeedFile {
    /// Opens a seed file and reads its header row.
    ///
    /// Cells and headers are trimmed of surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::IoError`] if the file cannot be opened, or
    /// [`DataError::CsvError`] if the header row is malformed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        debug!(path = %path.display(), columns = headers.len(), "seed file opened");
        Ok(Self {
            path,
            reader,
            headers,
        })
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column names from the header row.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Iterates over raw rows keyed by header name.
    pub fn rows(&mut self) -> impl Iterator<Item = Result<(u64, BTreeMap<String, String>)>> + '_ {
        let headers = &self.headers;
        self.reader.records().map(move |record| {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            let row = headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .collect();
            Ok((line, row))
        })
    }

    /// Iterates over rows converted to records of type `R`.
    ///
    /// Each row is validated against `R`'s field list: unknown columns,
    /// missing required columns and out-of-range values yield
    /// [`DataError::InvalidRow`] for that row.
    pub fn records<R: Record>(&mut self) -> impl Iterator<Item = Result<R>> + '_ {
        let path = self.path.display().to_string();
        self.rows().map(move |row| {
            let (line, raw) = row?;
            coerce_text_row::<R>(raw)
                .and_then(|row| R::from_row(&row))
                .map_err(|source| {
                    debug!(path = %path, line, error = %source, "invalid seed row");
                    DataError::InvalidRow {
                        path: path.clone(),
                        line,
                        source,
                    }
                })
        })
    }
}

/// Reads every record of a seed file at once.
///
/// Stops at the first invalid row.
pub fn read_records<R: Record>(path: impl AsRef<Path>) -> Result<Vec<R>> {
    SeedFile::open(path)?.records::<R>().collect()
}
