//! watched_calls schema.

use errorck_core::errors::StorageError;
use rusqlite::Connection;

/// The sink's single table. The assignment-site columns are populated only
/// for `assigned_not_read` rows; every other category leaves them NULL.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS watched_calls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    filename TEXT NOT NULL,
    line INTEGER NOT NULL,
    "column" INTEGER NOT NULL,
    handling_type TEXT NOT NULL,
    assigned_filename TEXT,
    assigned_line INTEGER,
    assigned_column INTEGER,
    UNIQUE(name, filename, line, "column", handling_type)
);
"#;

/// Create the schema on a fresh connection.
pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(SCHEMA_SQL)
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}
