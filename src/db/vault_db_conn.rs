// src/db/vault_db_conn.rs
use std::path::Path;
use std::{fs, time::Duration};

use rusqlite::{Connection, Result};
use tracing::{debug, warn};

use crate::error::StoreError;

/// Open (creating if needed) the vault database at `path`
pub fn open_vault_db<P: AsRef<Path>>(path: P) -> std::result::Result<Connection, StoreError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(err) = fs::create_dir_all(parent) {
            warn!(dir = %parent.display(), error = %err, "cannot create vault database directory");
            return Err(StoreError::Io(err));
        }
    }

    debug!(path = %path.display(), "opening vault database");
    let conn = Connection::open(path)?;
    Ok(prepare(conn)?)
}

/// Private in-memory database — tests and throwaway vaults
pub fn open_in_memory_db() -> Result<Connection> {
    prepare(Connection::open_in_memory()?)
}

fn prepare(conn: Connection) -> Result<Connection> {
    // another connection may hold the write lock mid-rotation
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS password_entries (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id           INTEGER NOT NULL,
            name               TEXT NOT NULL,
            description        TEXT,
            url                TEXT,
            username           TEXT,
            email              TEXT,
            encrypted_password TEXT NOT NULL,
            date_created       TEXT NOT NULL,
            date_last_modified TEXT NOT NULL,
            modified_by        TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_password_entries_owner ON password_entries(owner_id);
        "#,
    )?;
    Ok(conn)
}
