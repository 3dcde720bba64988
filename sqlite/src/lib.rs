//! SQLite store for the operations dashboard.
//!
//! This crate is the dashboard's data-access layer: a single SQLite file
//! holding users, security incidents, dataset metadata and IT tickets,
//! reached through one generic CRUD implementation.
//!
//! # Architecture
//!
//! - **`connection`**: [`ConnectionProvider`], one short-lived handle per
//!   operation, foreign keys on, commit-or-rollback scoping
//! - **`schema`**: `CREATE TABLE IF NOT EXISTS` generated from record field
//!   lists
//! - **`crud`**: [`Crud`], insert / fetch_all / fetch_by_id / update /
//!   delete over any [`Record`](dashboard_core::Record)
//! - **`services`**: [`IncidentService`], [`DatasetService`],
//!   [`TicketService`], domain-shaped façades with in-memory filters
//! - **`seed`**: [`seed_from_csv`], CSV loading that skips duplicate keys
//! - **`auth`**: [`AuthService`], Argon2id-salted accounts and login checks
//! - **`store`**: [`Store`], ties the above together
//!
//! # Quick start
//!
//! ```no_run
//! use dashboard_core::{Incident, IncidentStatus, Severity};
//! use dashboard_sqlite::Store;
//!
//! let store = Store::open("dashboard.db").unwrap();
//! store.auth().ensure_default_user().unwrap();
//! assert!(store.auth().verify_login("test", "123456").unwrap());
//!
//! let incidents = store.incidents();
//! incidents
//!     .create(&Incident::new("INC-1", "Phishing wave", "Phishing", Severity::High, "2024-06-01"))
//!     .unwrap();
//! incidents.update_status("INC-1", IncidentStatus::InProgress).unwrap();
//! println!("{} open incidents", incidents.list_open().unwrap().len());
//! ```

mod auth;
mod connection;
mod convert;
mod crud;
mod error;
mod schema;
mod seed;
mod services;
mod store;

pub use auth::{AuthService, DEFAULT_PASSWORD, DEFAULT_USERNAME, hash_password, verify_password};
pub use connection::ConnectionProvider;
pub use crud::{Crud, count_rows, delete_row, insert_row, select_all, select_one, update_row};
pub use error::{Result, StoreError};
pub use schema::{generate_schema_sql, table_sql};
pub use seed::{SeedReport, SeedSummary, seed_all, seed_from_csv};
pub use services::{DatasetService, IncidentService, TicketService};
pub use store::{Store, StoreStatus};
