//! The capability trait that makes a type storable by the generic CRUD layer.
//!
//! A [`Record`] names its table, its primary key column and its declared
//! column list, and converts itself to and from a [`Row`]. Nothing else is
//! needed for the store to create the table, insert, select, update and
//! delete rows of that type.

use std::str::FromStr;

use crate::field::{FieldSpec, FieldValue, Row};
use crate::validate::{Result, ValidationError};

/// A typed row of one table.
///
/// # Examples
///
/// ```
/// use dashboard_core::*;
///
/// let ticket = Ticket::new("T-1", "VPN down", Priority::Urgent, "Network", "2024-03-01");
/// let row = ticket.to_row();
/// assert_eq!(row["priority"], FieldValue::from("urgent"));
///
/// let back = Ticket::from_row(&row).unwrap();
/// assert_eq!(back, ticket);
/// assert_eq!(Ticket::table_name(), "tickets");
/// assert_eq!(Ticket::primary_key_field(), "ticket_id");
/// ```
pub trait Record: Sized {
    /// Table holding rows of this type.
    fn table_name() -> &'static str;

    /// Primary key column; must appear in [`field_list`](Self::field_list).
    fn primary_key_field() -> &'static str;

    /// Declared columns in storage order.
    fn field_list() -> &'static [FieldSpec];

    /// Primary key value of this record.
    fn key(&self) -> &str;

    /// Converts the record into a full row covering every declared column.
    fn to_row(&self) -> Row;

    /// Rebuilds a record from a row with canonical values.
    fn from_row(row: &Row) -> Result<Self>;
}

/// Reads a required text column.
pub fn required_text<R: Record>(row: &Row, field: &str) -> Result<String> {
    match row.get(field) {
        Some(FieldValue::Text(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(other) if !other.is_blank() => Err(wrong_kind(field, "text", other)),
        _ => Err(missing::<R>(field)),
    }
}

/// Reads an optional text column.
pub fn optional_text(row: &Row, field: &str) -> Result<Option<String>> {
    match row.get(field) {
        None | Some(FieldValue::Null) => Ok(None),
        Some(FieldValue::Text(s)) => Ok(Some(s.clone())),
        Some(other) => Err(wrong_kind(field, "text", other)),
    }
}

/// Reads an optional integer column.
pub fn optional_integer(row: &Row, field: &str) -> Result<Option<i64>> {
    match row.get(field) {
        None | Some(FieldValue::Null) => Ok(None),
        Some(FieldValue::Integer(v)) => Ok(Some(*v)),
        Some(other) => Err(wrong_kind(field, "integer", other)),
    }
}

/// Reads an optional real column. Integers are widened.
pub fn optional_real(row: &Row, field: &str) -> Result<Option<f64>> {
    match row.get(field) {
        None | Some(FieldValue::Null) => Ok(None),
        Some(FieldValue::Real(v)) => Ok(Some(*v)),
        Some(FieldValue::Integer(v)) => Ok(Some(*v as f64)),
        Some(other) => Err(wrong_kind(field, "real", other)),
    }
}

/// Reads a required enumerated column.
pub fn required_choice<R, T>(row: &Row, field: &str) -> Result<T>
where
    R: Record,
    T: FromStr<Err = ValidationError>,
{
    required_text::<R>(row, field)?.parse()
}

fn missing<R: Record>(field: &str) -> ValidationError {
    ValidationError::MissingField {
        table: R::table_name().to_string(),
        field: field.to_string(),
    }
}

fn wrong_kind(field: &str, expected: &'static str, found: &FieldValue) -> ValidationError {
    ValidationError::WrongKind {
        field: field.to_string(),
        expected,
        found: format!("{} '{found}'", found.kind_name()),
    }
}
