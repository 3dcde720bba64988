//! Domain services: one façade per table over the generic CRUD layer.
//!
//! Filtering is done in memory after a full fetch; no service joins across
//! tables.

mod datasets;
mod incidents;
mod tickets;

pub use datasets::DatasetService;
pub use incidents::IncidentService;
pub use tickets::TicketService;

use dashboard_core::{FieldValue, Row};

/// Builds a single-column change set.
pub(crate) fn change(field: &str, value: impl Into<FieldValue>) -> Row {
    Row::from([(field.to_string(), value.into())])
}
