//! Store lifecycle: schema creation, status, seeding, and access to the
//! domain services.
//!
//! # Example
//!
//! ```no_run
//! use dashboard_data::DashboardConfig;
//! use dashboard_sqlite::Store;
//!
//! let config = DashboardConfig::default();
//! let store = Store::open(&config.database).unwrap();
//!
//! store.auth().ensure_default_user().unwrap();
//! let summary = store.seed_all(&config).unwrap();
//! println!("seeded {} rows", summary.total().inserted);
//!
//! let status = store.status().unwrap();
//! println!("{} open tickets of {}", store.tickets().list_open().unwrap().len(), status.ticket_count);
//! ```

use std::path::Path;

use dashboard_core::{Dataset, Incident, Ticket, User};
use dashboard_data::DashboardConfig;
use tracing::info;

use crate::auth::AuthService;
use crate::connection::ConnectionProvider;
use crate::crud::count_rows;
use crate::error::Result;
use crate::schema::{generate_schema_sql, table_exists};
use crate::seed::{SeedSummary, seed_all};
use crate::services::{DatasetService, IncidentService, TicketService};

/// Entry point to the dashboard store.
///
/// Holds only the [`ConnectionProvider`]; every operation opens and
/// releases its own connection.
#[derive(Debug, Clone)]
pub struct Store {
    provider: ConnectionProvider,
}

impl Store {
    /// Opens the store at `path` and makes sure every table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = Self::new(ConnectionProvider::new(path.as_ref()));
        store.ensure_schema()?;
        Ok(store)
    }

    /// Wraps a provider without touching the store file.
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &ConnectionProvider {
        &self.provider
    }

    /// Creates any missing tables and indexes.
    ///
    /// Uses `CREATE ... IF NOT EXISTS` inside one transaction, so it is safe
    /// to call on every start.
    pub fn ensure_schema(&self) -> Result<()> {
        let sql = generate_schema_sql()?;
        self.provider.with_unit_of_work(|tx| {
            tx.execute_batch(&sql)?;
            Ok(())
        })?;
        info!(path = %self.provider.path().display(), "schema ensured");
        Ok(())
    }

    /// Returns whether the tables exist and how many rows each holds.
    pub fn status(&self) -> Result<StoreStatus> {
        let conn = self.provider.open_connection()?;
        // all four tables are created together
        if !table_exists(&conn, "users")? {
            return Ok(StoreStatus::default());
        }
        Ok(StoreStatus {
            tables_exist: true,
            user_count: count_rows::<User>(&conn)?,
            incident_count: count_rows::<Incident>(&conn)?,
            dataset_count: count_rows::<Dataset>(&conn)?,
            ticket_count: count_rows::<Ticket>(&conn)?,
        })
    }

    /// Seeds every domain table from the files named in `config`.
    pub fn seed_all(&self, config: &DashboardConfig) -> Result<SeedSummary> {
        seed_all(&self.provider, config)
    }

    pub fn incidents(&self) -> IncidentService<'_> {
        IncidentService::new(&self.provider)
    }

    pub fn datasets(&self) -> DatasetService<'_> {
        DatasetService::new(&self.provider)
    }

    pub fn tickets(&self) -> TicketService<'_> {
        TicketService::new(&self.provider)
    }

    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.provider)
    }
}

/// Snapshot of the store's tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatus {
    /// Whether the schema has been created.
    pub tables_exist: bool,
    pub user_count: usize,
    pub incident_count: usize,
    pub dataset_count: usize,
    pub ticket_count: usize,
}
