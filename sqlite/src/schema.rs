//! Table DDL generated from record field lists.
//!
//! Each table is declared by its [`Record`] implementation; this module
//! turns those declarations into `CREATE TABLE IF NOT EXISTS` statements so
//! the layout lives in exactly one place.
//!
//! # Table structure
//!
//! - `users`: accounts, keyed by `username`
//! - `incidents`: security incidents, keyed by `incident_id`
//! - `datasets`: dataset metadata, keyed by `dataset_id`
//! - `tickets`: IT tickets, keyed by `ticket_id`
//!
//! There are no references between tables.

use dashboard_core::{Dataset, Incident, Record, Ticket, User, validate_identifier};
use rusqlite::Connection;

use crate::error::Result;

/// Generates the `CREATE TABLE` statement for `R`.
///
/// Required columns are `NOT NULL`; the primary key column carries
/// `PRIMARY KEY`. Enumerations are not constrained at this level.
///
/// # Errors
///
/// Returns a validation error if the table or a column name is not a plain
/// identifier.
pub fn table_sql<R: Record>() -> Result<String> {
    let table = R::table_name();
    validate_identifier(table)?;

    let mut columns = Vec::with_capacity(R::field_list().len());
    for spec in R::field_list() {
        validate_identifier(spec.name)?;
        let mut column = format!("    {} {}", spec.name, spec.kind.sql_type());
        if spec.required {
            column.push_str(" NOT NULL");
        }
        if spec.name == R::primary_key_field() {
            column.push_str(" PRIMARY KEY");
        }
        columns.push(column);
    }

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n{}\n);\n",
        columns.join(",\n")
    ))
}

/// Generates the complete schema: all four tables plus secondary indexes.
pub fn generate_schema_sql() -> Result<String> {
    let mut sql = String::new();
    sql.push_str(&table_sql::<User>()?);
    sql.push_str(&table_sql::<Incident>()?);
    sql.push_str(&table_sql::<Dataset>()?);
    sql.push_str(&table_sql::<Ticket>()?);
    sql.push_str(
        r#"
CREATE INDEX IF NOT EXISTS idx_incidents_status ON incidents(status);
CREATE INDEX IF NOT EXISTS idx_tickets_priority ON tickets(priority);
"#,
    );
    Ok(sql)
}

/// Returns `true` if `table` exists in the store.
pub(crate) fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sql_marks_primary_key_and_required() {
        let sql = table_sql::<Incident>().unwrap();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS incidents ("));
        assert!(sql.contains("incident_id TEXT NOT NULL PRIMARY KEY"));
        assert!(sql.contains("severity TEXT NOT NULL"));
        assert!(sql.contains("assigned_to TEXT,"));
        assert!(!sql.contains("assigned_to TEXT NOT NULL"));
    }

    #[test]
    fn test_numeric_column_types() {
        let sql = table_sql::<Dataset>().unwrap();
        assert!(sql.contains("size_mb REAL"));
        assert!(sql.contains("row_count INTEGER"));
    }

    #[test]
    fn test_generate_schema_sql_contains_tables() {
        let sql = generate_schema_sql().unwrap();
        for table in ["users", "incidents", "datasets", "tickets"] {
            assert!(sql.contains(&format!("CREATE TABLE IF NOT EXISTS {table} (")));
        }
        assert!(sql.contains("idx_incidents_status"));
        assert!(sql.contains("idx_tickets_priority"));
    }

    #[test]
    fn test_schema_executes_twice() {
        let conn = Connection::open_in_memory().unwrap();
        let sql = generate_schema_sql().unwrap();
        conn.execute_batch(&sql).unwrap();
        conn.execute_batch(&sql).unwrap();
        assert!(table_exists(&conn, "tickets").unwrap());
        assert!(!table_exists(&conn, "nope").unwrap());
    }

    #[test]
    fn test_text_primary_key_rejects_null() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(&generate_schema_sql().unwrap()).unwrap();
        let result = conn.execute(
            "INSERT INTO users (username, password_hash, role, created_at) VALUES (NULL, 'h', 'user', 'now')",
            [],
        );
        assert!(result.is_err());
    }
}
