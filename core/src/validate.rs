//! Row and change-set validation.
//!
//! Everything that reaches the store passes through here first: whole rows
//! on insert, CSV rows on seeding, and partial change sets on update. Values
//! are coerced to the column's declared kind, enumerations are brought to
//! canonical form, and unknown or immutable columns are rejected instead of
//! being silently dropped.
//!
//! # Examples
//!
//! ```
//! use dashboard_core::*;
//!
//! let mut changes = Row::new();
//! changes.insert("severity".into(), FieldValue::from("High"));
//! let normalized = validate_changes::<Incident>(changes).unwrap();
//! assert_eq!(normalized["severity"], FieldValue::from("high"));
//!
//! let mut typo = Row::new();
//! typo.insert("severty".into(), FieldValue::from("high"));
//! assert!(matches!(
//!     validate_changes::<Incident>(typo),
//!     Err(ValidationError::UnknownField { .. })
//! ));
//! ```

use std::collections::BTreeMap;

use thiserror::Error;

use crate::field::{FieldKind, FieldSpec, FieldValue, Row, normalize_choice};
use crate::record::Record;

/// Malformed or disallowed input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required column is absent, `NULL`, or blank.
    #[error("{table}: missing required field '{field}'")]
    MissingField { table: String, field: String },

    /// A column name that the table does not declare.
    #[error("{table}: unknown field '{field}'")]
    UnknownField { table: String, field: String },

    /// An attempt to change a column that cannot be updated (the primary key).
    #[error("{table}: field '{field}' cannot be changed")]
    ImmutableField { table: String, field: String },

    /// A value whose kind does not fit the column.
    #[error("field '{field}': expected {expected}, got {found}")]
    WrongKind {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// An enumerated column received a value outside its choices.
    #[error("field '{field}': '{value}' is not one of [{allowed}]")]
    InvalidChoice {
        field: String,
        value: String,
        allowed: String,
    },

    /// An update with nothing to change.
    #[error("{0}: update has no changes")]
    EmptyChanges(String),

    /// A table or column identifier that is unsafe to interpolate into SQL.
    #[error("invalid identifier '{0}': must contain only alphanumeric characters and underscores")]
    InvalidIdentifier(String),
}

/// Convenience alias for results with [`ValidationError`].
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Checks that an identifier contains only alphanumerics and underscores.
pub fn validate_identifier(ident: &str) -> Result<()> {
    if ident.is_empty() || !ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidIdentifier(ident.to_string()));
    }
    Ok(())
}

/// Coerces a single value to the kind declared by `spec`.
///
/// Text input is parsed into integers and reals; integers widen to reals;
/// enumerated text is normalized and checked against its choices. `NULL`
/// passes through unchanged (requiredness is checked by the callers).
pub fn coerce_value(spec: &FieldSpec, value: FieldValue) -> Result<FieldValue> {
    let wrong_kind = |found: &FieldValue, expected: &'static str| ValidationError::WrongKind {
        field: spec.name.to_string(),
        expected,
        found: found.to_string(),
    };

    match (spec.kind, value) {
        (_, FieldValue::Null) => Ok(FieldValue::Null),

        (FieldKind::Text, FieldValue::Text(s)) => Ok(FieldValue::Text(s)),
        (FieldKind::Text, other @ (FieldValue::Integer(_) | FieldValue::Real(_))) => {
            Ok(FieldValue::Text(other.to_string()))
        }

        (FieldKind::Integer, FieldValue::Integer(v)) => Ok(FieldValue::Integer(v)),
        (FieldKind::Integer, FieldValue::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|_| wrong_kind(&FieldValue::Text(s.clone()), "integer")),
        (FieldKind::Integer, other) => Err(wrong_kind(&other, "integer")),

        (FieldKind::Real, FieldValue::Real(v)) => Ok(FieldValue::Real(v)),
        (FieldKind::Real, FieldValue::Integer(v)) => Ok(FieldValue::Real(v as f64)),
        (FieldKind::Real, FieldValue::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(FieldValue::Real)
            .map_err(|_| wrong_kind(&FieldValue::Text(s.clone()), "real")),

        (FieldKind::Choice(choices), FieldValue::Text(s)) => {
            let canonical = normalize_choice(&s);
            if choices.contains(&canonical.as_str()) {
                Ok(FieldValue::Text(canonical))
            } else {
                Err(ValidationError::InvalidChoice {
                    field: spec.name.to_string(),
                    value: s,
                    allowed: choices.join(", "),
                })
            }
        }
        (FieldKind::Choice(_), other) => Err(wrong_kind(&other, "text")),
    }
}

/// Validates a complete row for `R` and returns it in canonical form.
///
/// Rejects unknown columns, missing or blank required columns, and values
/// that cannot be coerced to their column kind. Absent optional columns are
/// filled with `NULL`.
pub fn validate_row<R: Record>(mut row: Row) -> Result<Row> {
    let table = R::table_name();
    reject_unknown::<R>(&row)?;

    let mut out = Row::new();
    for spec in R::field_list() {
        let value = row.remove(spec.name).unwrap_or(FieldValue::Null);
        if spec.required && value.is_blank() {
            return Err(ValidationError::MissingField {
                table: table.to_string(),
                field: spec.name.to_string(),
            });
        }
        out.insert(spec.name.to_string(), coerce_value(spec, value)?);
    }
    Ok(out)
}

/// Validates a partial change set for `R` and returns it in canonical form.
///
/// # Errors
///
/// - [`ValidationError::EmptyChanges`] if there is nothing to change.
/// - [`ValidationError::UnknownField`] for a column `R` does not declare.
/// - [`ValidationError::ImmutableField`] for the primary key column.
/// - [`ValidationError::MissingField`] when a required column is blanked.
/// - [`ValidationError::WrongKind`] / [`ValidationError::InvalidChoice`]
///   for values that do not fit their column.
pub fn validate_changes<R: Record>(changes: Row) -> Result<Row> {
    let table = R::table_name();
    if changes.is_empty() {
        return Err(ValidationError::EmptyChanges(table.to_string()));
    }
    reject_unknown::<R>(&changes)?;

    let mut out = Row::new();
    for (name, value) in changes {
        if name == R::primary_key_field() {
            return Err(ValidationError::ImmutableField {
                table: table.to_string(),
                field: name,
            });
        }
        // reject_unknown guarantees the lookup succeeds
        let Some(spec) = field_spec::<R>(&name) else {
            continue;
        };
        if spec.required && value.is_blank() {
            return Err(ValidationError::MissingField {
                table: table.to_string(),
                field: name,
            });
        }
        out.insert(name, coerce_value(spec, value)?);
    }
    Ok(out)
}

/// Converts a raw string row (as read from CSV) into a validated row for `R`.
///
/// Empty cells become `NULL`.
pub fn coerce_text_row<R: Record>(raw: BTreeMap<String, String>) -> Result<Row> {
    let row = raw
        .into_iter()
        .map(|(k, v)| {
            let value = if v.trim().is_empty() {
                FieldValue::Null
            } else {
                FieldValue::Text(v)
            };
            (k, value)
        })
        .collect();
    validate_row::<R>(row)
}

/// Looks up the declaration of `name` in `R`'s field list.
pub fn field_spec<R: Record>(name: &str) -> Option<&'static FieldSpec> {
    R::field_list().iter().find(|spec| spec.name == name)
}

fn reject_unknown<R: Record>(row: &Row) -> Result<()> {
    if let Some(name) = row.keys().find(|name| field_spec::<R>(name).is_none()) {
        return Err(ValidationError::UnknownField {
            table: R::table_name().to_string(),
            field: name.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dataset, Incident, Ticket};

    fn incident_row() -> Row {
        let mut row = Row::new();
        row.insert("incident_id".into(), "INC-1".into());
        row.insert("title".into(), "Phishing wave".into());
        row.insert("category".into(), "Phishing".into());
        row.insert("severity".into(), "High".into());
        row.insert("status".into(), "In Progress".into());
        row.insert("created_at".into(), "2024-01-01T00:00:00Z".into());
        row
    }

    #[test]
    fn test_valid_identifier() {
        assert!(validate_identifier("incidents").is_ok());
        assert!(validate_identifier("row_count").is_ok());
    }

    #[test]
    fn test_invalid_identifier() {
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("drop;--").is_err());
        assert!(validate_identifier("my table").is_err());
    }

    #[test]
    fn test_validate_row_normalizes_choices_and_fills_nulls() {
        let row = validate_row::<Incident>(incident_row()).unwrap();
        assert_eq!(row["severity"], FieldValue::from("high"));
        assert_eq!(row["status"], FieldValue::from("in-progress"));
        assert_eq!(row["assigned_to"], FieldValue::Null);
        assert_eq!(row.len(), Incident::field_list().len());
    }

    #[test]
    fn test_validate_row_missing_required() {
        let mut row = incident_row();
        row.remove("title");
        let err = validate_row::<Incident>(row).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                table: "incidents".into(),
                field: "title".into()
            }
        );
    }

    #[test]
    fn test_validate_row_blank_required() {
        let mut row = incident_row();
        row.insert("category".into(), "  ".into());
        assert!(matches!(
            validate_row::<Incident>(row),
            Err(ValidationError::MissingField { .. })
        ));
    }

    #[test]
    fn test_validate_row_rejects_unknown_column() {
        let mut row = incident_row();
        row.insert("colour".into(), "red".into());
        assert!(matches!(
            validate_row::<Incident>(row),
            Err(ValidationError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_validate_row_rejects_bad_choice() {
        let mut row = incident_row();
        row.insert("severity".into(), "apocalyptic".into());
        assert!(matches!(
            validate_row::<Incident>(row),
            Err(ValidationError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn test_changes_reject_primary_key() {
        let mut changes = Row::new();
        changes.insert("ticket_id".into(), "T-2".into());
        assert!(matches!(
            validate_changes::<Ticket>(changes),
            Err(ValidationError::ImmutableField { .. })
        ));
    }

    #[test]
    fn test_changes_reject_empty() {
        assert!(matches!(
            validate_changes::<Ticket>(Row::new()),
            Err(ValidationError::EmptyChanges(_))
        ));
    }

    #[test]
    fn test_changes_allow_clearing_optional() {
        let mut changes = Row::new();
        changes.insert("description".into(), FieldValue::Null);
        let out = validate_changes::<Dataset>(changes).unwrap();
        assert_eq!(out["description"], FieldValue::Null);
    }

    #[test]
    fn test_numeric_coercion() {
        let mut changes = Row::new();
        changes.insert("size_mb".into(), "12.5".into());
        changes.insert("row_count".into(), "400".into());
        let out = validate_changes::<Dataset>(changes).unwrap();
        assert_eq!(out["size_mb"], FieldValue::Real(12.5));
        assert_eq!(out["row_count"], FieldValue::Integer(400));

        let mut bad = Row::new();
        bad.insert("row_count".into(), "many".into());
        assert!(matches!(
            validate_changes::<Dataset>(bad),
            Err(ValidationError::WrongKind { .. })
        ));
    }

    #[test]
    fn test_integer_widens_to_real() {
        let spec = FieldSpec::real("size_mb");
        assert_eq!(
            coerce_value(&spec, FieldValue::Integer(3)).unwrap(),
            FieldValue::Real(3.0)
        );
    }

    #[test]
    fn test_coerce_text_row_empty_cells_are_null() {
        let mut raw = BTreeMap::new();
        raw.insert("dataset_id".to_string(), "DS-1".to_string());
        raw.insert("name".to_string(), "Customers".to_string());
        raw.insert("owner".to_string(), "alice".to_string());
        raw.insert("classification".to_string(), "Internal".to_string());
        raw.insert("size_mb".to_string(), "".to_string());
        let row = coerce_text_row::<Dataset>(raw).unwrap();
        assert_eq!(row["size_mb"], FieldValue::Null);
        assert_eq!(row["classification"], FieldValue::from("internal"));
    }
}
