//! Core record types and validation for the operations dashboard store.
//!
//! This crate defines the typed data model shared by every other crate:
//!
//! - [`User`], [`Incident`], [`Dataset`], [`Ticket`]: one type per table.
//! - [`Severity`], [`IncidentStatus`], [`Classification`], [`Priority`],
//!   [`TicketStatus`]: enumerated columns, stored in canonical
//!   lowercase-hyphen form.
//! - [`Record`]: the capability trait (`table_name` / `primary_key_field` /
//!   `field_list`) that lets one generic CRUD implementation serve every
//!   table.
//! - [`FieldSpec`], [`FieldValue`], [`Row`]: the declared column model.
//!
//! Validation ([`validate_row`], [`validate_changes`]) rejects missing
//! required columns, unknown or immutable columns, and values outside a
//! column's kind or enumeration before anything reaches the store.
//!
//! # Example
//!
//! ```
//! use dashboard_core::*;
//!
//! let incident = Incident::new("INC-7", "Ransomware note", "Malware", Severity::Critical, "2024-02-11");
//! let row = validate_row::<Incident>(incident.to_row()).unwrap();
//! assert_eq!(row["status"], FieldValue::from("open"));
//! assert_eq!(Incident::from_row(&row).unwrap(), incident);
//! ```

mod field;
mod record;
mod types;
mod validate;

pub use field::{FieldKind, FieldSpec, FieldValue, Row, normalize_choice};
pub use record::{
    Record, optional_integer, optional_real, optional_text, required_choice, required_text,
};
pub use types::*;
pub use validate::{
    Result, ValidationError, coerce_text_row, coerce_value, field_spec, validate_changes,
    validate_identifier, validate_row,
};
