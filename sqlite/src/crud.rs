//! Generic create/read/update/delete over any [`Record`].
//!
//! SQL is assembled only from a record's static table name and field list,
//! never from caller-supplied names: update change sets are validated
//! against the field list before any column name reaches a statement, and
//! every value is bound as a parameter.
//!
//! [`Crud`] runs each operation as its own unit of work on a fresh
//! connection. The `*_row` free functions do the same work on a connection
//! the caller already holds.
//!
//! # Example
//!
//! ```no_run
//! use dashboard_core::{Priority, Ticket};
//! use dashboard_sqlite::{ConnectionProvider, Crud};
//!
//! let provider = ConnectionProvider::new("dashboard.db");
//! let tickets = Crud::<Ticket>::new(&provider);
//!
//! tickets.insert(&Ticket::new("T-9", "Disk full", Priority::High, "Storage", "2024-04-02")).unwrap();
//! assert!(tickets.fetch_by_id("T-9").unwrap().is_some());
//! assert!(tickets.delete("T-9").unwrap());
//! assert!(!tickets.delete("T-9").unwrap());
//! ```

use std::marker::PhantomData;

use dashboard_core::{Record, Row, field_spec, validate_changes, validate_row};
use rusqlite::{Connection, OptionalExtension, params_from_iter};
use tracing::debug;

use crate::connection::ConnectionProvider;
use crate::convert::{decode, read_row, to_sql};
use crate::error::{Result, StoreError};

/// CRUD operations for one record type.
pub struct Crud<'p, R> {
    provider: &'p ConnectionProvider,
    _record: PhantomData<fn() -> R>,
}

impl<'p, R: Record> Crud<'p, R> {
    pub fn new(provider: &'p ConnectionProvider) -> Self {
        Self {
            provider,
            _record: PhantomData,
        }
    }

    /// Inserts one record.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if a required column is blank.
    /// - [`StoreError::DuplicateKey`] if the primary key already exists.
    pub fn insert(&self, record: &R) -> Result<()> {
        let row = validate_row::<R>(record.to_row())?;
        self.provider.with_unit_of_work(|tx| insert_row::<R>(tx, &row))
    }

    /// Returns every record, ordered by primary key ascending.
    pub fn fetch_all(&self) -> Result<Vec<R>> {
        let conn = self.provider.open_connection()?;
        select_all::<R>(&conn)
    }

    /// Returns the record with primary key `id`, or `None`.
    pub fn fetch_by_id(&self, id: &str) -> Result<Option<R>> {
        let conn = self.provider.open_connection()?;
        select_one::<R>(&conn, id)
    }

    /// Applies a partial update and returns the updated record.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] for an empty change set, an unknown or
    ///   primary-key column, or a value that does not fit its column.
    /// - [`StoreError::NotFound`] if no record has primary key `id`; the
    ///   table is left unchanged.
    pub fn update(&self, id: &str, changes: Row) -> Result<R> {
        let changes = validate_changes::<R>(changes)?;
        self.provider.with_unit_of_work(|tx| {
            update_row::<R>(tx, id, &changes)?;
            select_one::<R>(tx, id)?.ok_or_else(|| not_found::<R>(id))
        })
    }

    /// Deletes the record with primary key `id`.
    ///
    /// Returns whether a record was present. Deleting a missing key is not
    /// an error.
    pub fn delete(&self, id: &str) -> Result<bool> {
        self.provider.with_unit_of_work(|tx| delete_row::<R>(tx, id))
    }

    /// Number of records in the table.
    pub fn count(&self) -> Result<usize> {
        let conn = self.provider.open_connection()?;
        count_rows::<R>(&conn)
    }
}

fn column_list<R: Record>() -> String {
    R::field_list()
        .iter()
        .map(|spec| spec.name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn not_found<R: Record>(id: &str) -> StoreError {
    StoreError::NotFound {
        table: R::table_name().to_string(),
        key: id.to_string(),
    }
}

fn is_key_collision(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Inserts a validated row for `R`.
pub fn insert_row<R: Record>(conn: &Connection, row: &Row) -> Result<()> {
    let table = R::table_name();
    let placeholders = (1..=R::field_list().len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        column_list::<R>()
    );
    let values = R::field_list()
        .iter()
        .map(|spec| row.get(spec.name).map(to_sql).unwrap_or(rusqlite::types::Value::Null));

    let key = row
        .get(R::primary_key_field())
        .map(ToString::to_string)
        .unwrap_or_default();
    debug!(table, key = %key, "insert");

    match conn.execute(&sql, params_from_iter(values)) {
        Ok(_) => Ok(()),
        Err(e) if is_key_collision(&e) => Err(StoreError::DuplicateKey {
            table: table.to_string(),
            key,
        }),
        Err(e) => Err(e.into()),
    }
}

/// Selects every row of `R`'s table, ordered by primary key.
pub fn select_all<R: Record>(conn: &Connection) -> Result<Vec<R>> {
    let sql = format!(
        "SELECT {} FROM {} ORDER BY {} ASC",
        column_list::<R>(),
        R::table_name(),
        R::primary_key_field()
    );
    let mut stmt = conn.prepare(&sql)?;
    let raw: Vec<Row> = stmt
        .query_map([], |row| read_row::<R>(row))?
        .collect::<std::result::Result<_, _>>()?;
    debug!(table = R::table_name(), rows = raw.len(), "select all");
    raw.into_iter().map(decode::<R>).collect()
}

/// Selects the row of `R`'s table with primary key `id`.
pub fn select_one<R: Record>(conn: &Connection, id: &str) -> Result<Option<R>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE {} = ?1",
        column_list::<R>(),
        R::table_name(),
        R::primary_key_field()
    );
    let raw = conn
        .query_row(&sql, [id], |row| read_row::<R>(row))
        .optional()?;
    raw.map(decode::<R>).transpose()
}

/// Applies a validated change set to the row with primary key `id`.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] if no row matched.
pub fn update_row<R: Record>(conn: &Connection, id: &str, changes: &Row) -> Result<()> {
    let mut assignments = Vec::with_capacity(changes.len());
    let mut values = Vec::with_capacity(changes.len() + 1);
    for (name, value) in changes {
        // column names come from the static field list, not from the caller
        let spec = field_spec::<R>(name).ok_or_else(|| {
            StoreError::Validation(dashboard_core::ValidationError::UnknownField {
                table: R::table_name().to_string(),
                field: name.clone(),
            })
        })?;
        assignments.push(format!("{} = ?{}", spec.name, values.len() + 1));
        values.push(to_sql(value));
    }
    values.push(rusqlite::types::Value::Text(id.to_string()));

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?{}",
        R::table_name(),
        assignments.join(", "),
        R::primary_key_field(),
        values.len()
    );
    debug!(table = R::table_name(), key = id, columns = changes.len(), "update");

    let affected = conn.execute(&sql, params_from_iter(values))?;
    if affected == 0 {
        return Err(not_found::<R>(id));
    }
    Ok(())
}

/// Deletes the row with primary key `id`; returns whether it existed.
pub fn delete_row<R: Record>(conn: &Connection, id: &str) -> Result<bool> {
    let sql = format!(
        "DELETE FROM {} WHERE {} = ?1",
        R::table_name(),
        R::primary_key_field()
    );
    let affected = conn.execute(&sql, [id])?;
    debug!(table = R::table_name(), key = id, present = affected > 0, "delete");
    Ok(affected > 0)
}

/// Counts rows in `R`'s table.
pub fn count_rows<R: Record>(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", R::table_name()),
        [],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}
