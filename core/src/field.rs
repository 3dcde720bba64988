//! Field model shared by every record type.
//!
//! A record declares its columns once as a static list of [`FieldSpec`]s.
//! That list drives table DDL, `INSERT`/`SELECT` column lists, CSV coercion
//! and update validation, so a column is never spelled in two places.

use std::collections::BTreeMap;
use std::fmt;

/// A loosely-typed column value as it travels between records, CSV files
/// and SQLite.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// SQL `NULL` / empty CSV cell.
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// Double precision float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
}

impl FieldValue {
    /// Returns `true` for [`FieldValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns the text payload, if this is a [`FieldValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` when the value is `NULL` or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Short name of the value's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Integer(_) => "integer",
            FieldValue::Real(_) => "real",
            FieldValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Integer(v) => write!(f, "{v}"),
            FieldValue::Real(v) => write!(f, "{v}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Real(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// Storage kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text (`TEXT`).
    Text,
    /// Whole number (`INTEGER`).
    Integer,
    /// Floating point number (`REAL`).
    Real,
    /// Text restricted to a fixed set of canonical values (`TEXT`).
    Choice(&'static [&'static str]),
}

impl FieldKind {
    /// SQLite column type for this kind.
    pub fn sql_type(&self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::Choice(_) => "TEXT",
            FieldKind::Integer => "INTEGER",
            FieldKind::Real => "REAL",
        }
    }
}

/// Declaration of a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column name.
    pub name: &'static str,
    /// Storage kind.
    pub kind: FieldKind,
    /// Whether the column must be present and non-blank.
    pub required: bool,
}

impl FieldSpec {
    /// Optional free-text column.
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: false,
        }
    }

    /// Optional integer column.
    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
            required: false,
        }
    }

    /// Optional real column.
    pub const fn real(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Real,
            required: false,
        }
    }

    /// Optional enumerated column.
    pub const fn choice(name: &'static str, choices: &'static [&'static str]) -> Self {
        Self {
            name,
            kind: FieldKind::Choice(choices),
            required: false,
        }
    }

    /// Marks the column as required.
    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }
}

/// A row keyed by column name.
///
/// Used for whole records (insert/select) and for partial change sets
/// (update). Ordering of keys is irrelevant; column order always comes from
/// the record's field list.
pub type Row = BTreeMap<String, FieldValue>;

/// Brings free-form enumeration input into canonical form.
///
/// Trims, lowercases, and maps spaces and underscores to hyphens, so
/// `"In Progress"`, `"in_progress"` and `"in-progress"` all compare equal.
///
/// # Examples
///
/// ```
/// use dashboard_core::normalize_choice;
///
/// assert_eq!(normalize_choice(" In Progress "), "in-progress");
/// assert_eq!(normalize_choice("CRITICAL"), "critical");
/// ```
pub fn normalize_choice(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_into_field_value() {
        assert_eq!(FieldValue::from(None::<String>), FieldValue::Null);
        assert_eq!(
            FieldValue::from(Some("x".to_string())),
            FieldValue::Text("x".into())
        );
        assert_eq!(FieldValue::from(Some(3_i64)), FieldValue::Integer(3));
    }

    #[test]
    fn test_blank_values() {
        assert!(FieldValue::Null.is_blank());
        assert!(FieldValue::Text("   ".into()).is_blank());
        assert!(!FieldValue::Text("a".into()).is_blank());
        assert!(!FieldValue::Integer(0).is_blank());
    }

    #[test]
    fn test_required_builder_keeps_kind() {
        let spec = FieldSpec::real("size_mb").required();
        assert!(spec.required);
        assert_eq!(spec.kind, FieldKind::Real);
        assert_eq!(spec.kind.sql_type(), "REAL");
    }

    #[test]
    fn test_choice_sql_type_is_text() {
        let spec = FieldSpec::choice("status", &["open", "closed"]);
        assert_eq!(spec.kind.sql_type(), "TEXT");
    }
}
