//! The call sink: exclusive destination ownership, prepared inserts,
//! deduplication, sticky error latch.

use std::path::Path;

use errorck_core::classify::{AssignedLocation, HandlingCategory, WatchedCall};
use errorck_core::errors::StorageError;
use rusqlite::{params, Connection};
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::schema;

const INSERT_SQL: &str = r#"
INSERT OR IGNORE INTO watched_calls
    (name, filename, line, "column", handling_type,
     assigned_filename, assigned_line, assigned_column)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

/// Single-writer sink over one SQLite database.
///
/// Records are unique on (name, filename, line, column, handling_type):
/// duplicates within a run are dropped in memory and the schema enforces
/// the same constraint. After the first write failure all further inserts
/// are no-ops and `ok()` reports false.
#[derive(Debug)]
pub struct CallSink {
    conn: Connection,
    seen: FxHashSet<(String, String, u32, u32, &'static str)>,
    error: Option<StorageError>,
}

impl CallSink {
    /// Create the sink, refusing an existing destination unless
    /// `overwrite` is set.
    pub fn create(path: &Path, overwrite: bool) -> Result<Self, StorageError> {
        if path.exists() {
            if !overwrite {
                return Err(StorageError::AlreadyExists {
                    path: path.display().to_string(),
                });
            }
            if path.is_dir() {
                return Err(StorageError::PathIsDirectory {
                    path: path.display().to_string(),
                });
            }
            std::fs::remove_file(path).map_err(|e| StorageError::RemoveFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        }

        let conn = Connection::open(path).map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
        schema::init_schema(&conn)?;
        debug!(path = %path.display(), "created sink");

        Ok(Self {
            conn,
            seen: FxHashSet::default(),
            error: None,
        })
    }

    /// In-memory sink (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
        schema::init_schema(&conn)?;
        Ok(Self {
            conn,
            seen: FxHashSet::default(),
            error: None,
        })
    }

    /// Insert one record. Returns false once the sink has latched an
    /// error; duplicate records are dropped and count as success.
    pub fn insert(&mut self, call: &WatchedCall) -> bool {
        if self.error.is_some() {
            return false;
        }

        let key = (
            call.name.clone(),
            call.filename.clone(),
            call.line,
            call.column,
            call.category.as_str(),
        );
        if !self.seen.insert(key) {
            debug!(name = %call.name, line = call.line, "dropped duplicate record");
            return true;
        }

        let assigned = call.assigned.as_ref();
        let result = {
            match self.conn.prepare_cached(INSERT_SQL) {
                Ok(mut stmt) => stmt.execute(params![
                    call.name,
                    call.filename,
                    call.line,
                    call.column,
                    call.category.as_str(),
                    assigned.map(|a| a.filename.clone()),
                    assigned.map(|a| a.line),
                    assigned.map(|a| a.column),
                ]),
                Err(e) => Err(e),
            }
        };

        match result {
            Ok(_) => true,
            Err(e) => {
                self.latch(e.to_string());
                false
            }
        }
    }

    /// True while no write failure has been latched.
    pub fn ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&StorageError> {
        self.error.as_ref()
    }

    /// Consume the sink, yielding the latched error if any.
    pub fn into_error(self) -> Option<StorageError> {
        self.error
    }

    /// Number of rows currently persisted.
    pub fn count(&self) -> Result<i64, StorageError> {
        self.conn
            .query_row("SELECT COUNT(*) FROM watched_calls", [], |row| row.get(0))
            .map_err(|e| StorageError::SqliteError {
                message: e.to_string(),
            })
    }

    fn latch(&mut self, message: String) {
        if self.error.is_none() {
            warn!(%message, "sink write failed; latching error");
            self.error = Some(StorageError::SqliteError { message });
        }
    }
}

/// Read every row back in insertion order. Used by tests and downstream
/// tooling.
pub fn read_all(path: &Path) -> Result<Vec<WatchedCall>, StorageError> {
    let conn = Connection::open(path).map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    let mut stmt = conn
        .prepare(
            r#"SELECT name, filename, line, "column", handling_type,
                      assigned_filename, assigned_line, assigned_column
               FROM watched_calls ORDER BY id"#,
        )
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;

    let rows = stmt
        .query_map([], |row| {
            let label: String = row.get(4)?;
            let assigned_filename: Option<String> = row.get(5)?;
            let assigned_line: Option<u32> = row.get(6)?;
            let assigned_column: Option<u32> = row.get(7)?;
            let assigned = match (assigned_filename, assigned_line, assigned_column) {
                (Some(filename), Some(line), Some(column)) => Some(AssignedLocation {
                    filename,
                    line,
                    column,
                }),
                _ => None,
            };
            Ok(WatchedCall {
                name: row.get(0)?,
                filename: row.get(1)?,
                line: row.get(2)?,
                column: row.get(3)?,
                category: HandlingCategory::from_str_label(&label)
                    .unwrap_or(HandlingCategory::UsedOther),
                assigned,
            })
        })
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?);
    }
    Ok(result)
}
