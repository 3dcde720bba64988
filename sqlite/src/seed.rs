//! Populating the store from CSV seed files.
//!
//! Seeding is safe to repeat: a row whose primary key is already present
//! is skipped and counted, and the next row is tried. Any other failure
//! (unreadable file, malformed row, storage error) stops the file at that
//! row; rows inserted before it stay committed.

use std::path::Path;

use dashboard_core::{Dataset, Incident, Record, Ticket};
use dashboard_data::{DashboardConfig, SeedFile};
use tracing::{info, warn};

use crate::connection::ConnectionProvider;
use crate::crud::Crud;
use crate::error::{Result, StoreError};

/// Outcome of seeding one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Rows newly inserted.
    pub inserted: usize,
    /// Rows skipped because their key already existed.
    pub skipped: usize,
}

impl SeedReport {
    fn merge(&mut self, other: &SeedReport) {
        self.inserted += other.inserted;
        self.skipped += other.skipped;
    }
}

/// Outcome of seeding every domain file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub incidents: SeedReport,
    pub datasets: SeedReport,
    pub tickets: SeedReport,
}

impl SeedSummary {
    /// Totals across all three files.
    pub fn total(&self) -> SeedReport {
        let mut total = SeedReport::default();
        total.merge(&self.incidents);
        total.merge(&self.datasets);
        total.merge(&self.tickets);
        total
    }
}

/// Inserts every row of the CSV file at `path` into `R`'s table.
///
/// # Errors
///
/// Returns [`StoreError::Data`] if the file cannot be read or a row is
/// invalid, or [`StoreError::Storage`] if an insert fails for any reason
/// other than a duplicate key.
pub fn seed_from_csv<R: Record>(provider: &ConnectionProvider, path: impl AsRef<Path>) -> Result<SeedReport> {
    let path = path.as_ref();
    let table = R::table_name();
    let crud = Crud::<R>::new(provider);
    let mut file = SeedFile::open(path)?;
    let mut report = SeedReport::default();

    for record in file.records::<R>() {
        let record = record?;
        match crud.insert(&record) {
            Ok(()) => report.inserted += 1,
            Err(StoreError::DuplicateKey { key, .. }) => {
                warn!(table, key = %key, "skipping seed row: key already exists");
                report.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        table,
        path = %path.display(),
        inserted = report.inserted,
        skipped = report.skipped,
        "seed file loaded"
    );
    Ok(report)
}

/// Seeds a file if it exists; a missing file yields an empty report.
fn seed_if_present<R: Record>(provider: &ConnectionProvider, path: &Path) -> Result<SeedReport> {
    if !path.exists() {
        warn!(table = R::table_name(), path = %path.display(), "seed file not found, skipping");
        return Ok(SeedReport::default());
    }
    seed_from_csv::<R>(provider, path)
}

/// Seeds incidents, datasets and tickets from the files named in `config`.
pub fn seed_all(provider: &ConnectionProvider, config: &DashboardConfig) -> Result<SeedSummary> {
    let summary = SeedSummary {
        incidents: seed_if_present::<Incident>(provider, &config.incidents_csv())?,
        datasets: seed_if_present::<Dataset>(provider, &config.datasets_csv())?,
        tickets: seed_if_present::<Ticket>(provider, &config.tickets_csv())?,
    };
    let total = summary.total();
    info!(
        inserted = total.inserted,
        skipped = total.skipped,
        "seed summary"
    );
    Ok(summary)
}
