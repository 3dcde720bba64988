//! Conversion between [`FieldValue`] and SQLite values.
//!
//! Columns are always read in the order of the record's field list, so a
//! `SELECT` built from that list can be decoded positionally.

use dashboard_core::{FieldValue, Record, Row, coerce_value};
use rusqlite::types::{Type, Value, ValueRef};

use crate::error::Result;

/// Converts a field value into an owned SQLite value for binding.
pub(crate) fn to_sql(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Integer(v) => Value::Integer(*v),
        FieldValue::Real(v) => Value::Real(*v),
        FieldValue::Text(s) => Value::Text(s.clone()),
    }
}

/// Converts a borrowed SQLite value into a field value.
///
/// Blobs are never written by this crate and are rejected.
pub(crate) fn from_sql(idx: usize, name: &str, value: ValueRef<'_>) -> rusqlite::Result<FieldValue> {
    match value {
        ValueRef::Null => Ok(FieldValue::Null),
        ValueRef::Integer(v) => Ok(FieldValue::Integer(v)),
        ValueRef::Real(v) => Ok(FieldValue::Real(v)),
        ValueRef::Text(bytes) => Ok(FieldValue::Text(String::from_utf8_lossy(bytes).into_owned())),
        ValueRef::Blob(_) => Err(rusqlite::Error::InvalidColumnType(
            idx,
            name.to_string(),
            Type::Blob,
        )),
    }
}

/// Reads one result row selected with `R`'s column list.
pub(crate) fn read_row<R: Record>(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    R::field_list()
        .iter()
        .enumerate()
        .map(|(idx, spec)| {
            let value = from_sql(idx, spec.name, row.get_ref(idx)?)?;
            Ok((spec.name.to_string(), value))
        })
        .collect()
}

/// Turns a raw row read from the store into a record, coercing each column
/// to its declared kind first.
pub(crate) fn decode<R: Record>(raw: Row) -> Result<R> {
    let mut row = Row::new();
    for spec in R::field_list() {
        let value = raw.get(spec.name).cloned().unwrap_or(FieldValue::Null);
        row.insert(spec.name.to_string(), coerce_value(spec, value)?);
    }
    Ok(R::from_row(&row)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{Classification, Dataset};
    use rusqlite::Connection;

    #[test]
    fn test_to_sql_kinds() {
        assert_eq!(to_sql(&FieldValue::Null), Value::Null);
        assert_eq!(to_sql(&FieldValue::Integer(7)), Value::Integer(7));
        assert_eq!(to_sql(&FieldValue::Real(1.5)), Value::Real(1.5));
        assert_eq!(to_sql(&"x".into()), Value::Text("x".into()));
    }

    #[test]
    fn test_blob_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let result: rusqlite::Result<FieldValue> =
            conn.query_row("SELECT x'00'", [], |row| from_sql(0, "b", row.get_ref(0)?));
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_widens_integer_to_real() {
        let mut raw = Dataset::new("DS-1", "Logs", "ops", Classification::Public).to_row();
        raw.insert("size_mb".into(), FieldValue::Integer(10));
        let dataset: Dataset = decode(raw).unwrap();
        assert_eq!(dataset.size_mb, Some(10.0));
    }
}
