pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::Result;
use rusqlite::{Connection, ErrorCode};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use tracing::info;

/// The store could not be reached at all, as opposed to a query failing.
#[derive(Debug, Error)]
#[error("database connection unavailable: {0}")]
pub struct StoreUnavailable(pub String);

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreUnavailable(format!("DB lock poisoned: {}", e)))?;
        f(&conn)
    }
}

/// True when `err` means the store itself is unreachable (poisoned handle,
/// file cannot be opened, database busy or locked).
pub fn is_unavailable(err: &anyhow::Error) -> bool {
    if err.downcast_ref::<StoreUnavailable>().is_some() {
        return true;
    }
    matches!(
        err.downcast_ref::<rusqlite::Error>().and_then(|e| e.sqlite_error_code()),
        Some(ErrorCode::CannotOpen | ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn poisoned_lock_is_unavailable() {
        let err = anyhow::Error::new(StoreUnavailable("poisoned".into()));
        assert!(is_unavailable(&err));
    }

    #[test]
    fn ordinary_errors_are_not_unavailable() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .with_conn(|conn| {
                conn.execute("SELECT * FROM no_such_table", [])?;
                Ok(())
            })
            .unwrap_err();
        assert!(!is_unavailable(&err));
        assert!(!is_unavailable(&anyhow::anyhow!("boom")));
    }

    #[test]
    fn open_on_disk_runs_migrations() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chirkut.db");

        {
            let db = Database::open(&path).unwrap();
            db.create_user("nil", "Nil Noman", "hash").unwrap();
        }

        // Reopening must not re-run the schema or lose rows
        let db = Database::open(&path).unwrap();
        assert!(db.get_user("nil").unwrap().is_some());
    }
}
