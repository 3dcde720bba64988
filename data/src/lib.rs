//! Seed files and configuration for the operations dashboard.
//!
//! This crate covers everything the store reads from disk other than the
//! store itself:
//!
//! - [`SeedFile`]: lazy CSV reader yielding typed records, used to populate
//!   an empty store.
//! - [`DashboardConfig`]: YAML configuration with defaults for every field,
//!   plus the environment lookup for the assistant API key.
//!
//! # Quick start
//!
//! ```no_run
//! use dashboard_core::Ticket;
//! use dashboard_data::{DashboardConfig, read_records};
//!
//! let config = DashboardConfig::load("dashboard.yaml").unwrap_or_default();
//! let tickets = read_records::<Ticket>(config.tickets_csv()).unwrap();
//! println!("{} tickets in seed file", tickets.len());
//! ```

mod config;
mod error;
mod loader;

pub use config::{API_KEY_ENV, AssistantSettings, DashboardConfig, SeedFiles};
pub use error::{DataError, Result};
pub use loader::{SeedFile, read_records};
