// src/db/vault_db_ops.rs
//! SQLite-backed [`VaultStore`]
//!
//! One connection behind a mutex. The connection lock is only held for the
//! duration of a single statement or transaction, never across key
//! derivation, so listing stays responsive while a rotation is staging.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use tracing::{debug, info};

use crate::crypto::Envelope;
use crate::db::vault_db_conn::{open_in_memory_db, open_vault_db};
use crate::error::StoreError;
use crate::model::{NewRecord, OwnerId, RecordId, RecordMetadata, VaultRecord};
use crate::rotation::StagedEnvelope;
use crate::store::{StoreResult, VaultStore};

const SELECT_COLUMNS: &str = "id, owner_id, name, description, url, username, email, \
     encrypted_password, date_created, date_last_modified, modified_by";

pub struct SqliteVaultStore {
    conn: Mutex<Connection>,
}

impl SqliteVaultStore {
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Ok(Self::from_connection(open_vault_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::from_connection(open_in_memory_db()?))
    }

    /// Open the database named by the loaded config (`PEV_VAULT_DB` wins)
    pub fn open_default() -> StoreResult<Self> {
        Self::open(crate::config::load().store_path())
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // a panic mid-statement leaves SQLite itself consistent
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Column values exactly as stored, before timestamp parsing
struct RawRecord {
    id: i64,
    owner_id: i64,
    metadata: RecordMetadata,
    envelope: String,
    date_created: String,
    date_last_modified: String,
    modified_by: String,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            metadata: RecordMetadata {
                name: row.get(2)?,
                description: row.get(3)?,
                url: row.get(4)?,
                username: row.get(5)?,
                email: row.get(6)?,
            },
            envelope: row.get(7)?,
            date_created: row.get(8)?,
            date_last_modified: row.get(9)?,
            modified_by: row.get(10)?,
        })
    }

    fn into_record(self) -> StoreResult<VaultRecord> {
        Ok(VaultRecord {
            id: RecordId(self.id),
            owner: OwnerId(self.owner_id),
            metadata: self.metadata,
            envelope: Envelope::from_text(self.envelope),
            date_created: parse_timestamp(&self.date_created)?,
            date_last_modified: parse_timestamp(&self.date_last_modified)?,
            modified_by: self.modified_by,
        })
    }
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, StoreError> {
    Ok(DateTime::parse_from_rfc3339(text)?.with_timezone(&Utc))
}

impl VaultStore for SqliteVaultStore {
    fn list_records(&self, owner: OwnerId) -> StoreResult<Vec<VaultRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM password_entries WHERE owner_id = ?1 ORDER BY id"
        ))?;
        let raw = stmt
            .query_map([owner.0], RawRecord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raw.into_iter().map(RawRecord::into_record).collect()
    }

    fn get_record(&self, id: RecordId) -> StoreResult<Option<VaultRecord>> {
        let raw = self
            .conn()
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM password_entries WHERE id = ?1"),
                [id.0],
                RawRecord::from_row,
            )
            .optional()?;
        raw.map(RawRecord::into_record).transpose()
    }

    fn insert_record(&self, record: NewRecord) -> StoreResult<VaultRecord> {
        let conn = self.conn();
        let stamp = record.created_at.to_rfc3339();
        conn.execute(
            r#"
            INSERT INTO password_entries (
                owner_id, name, description, url, username, email,
                encrypted_password, date_created, date_last_modified, modified_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8, ?9)
            "#,
            params![
                record.owner.0,
                &record.metadata.name,
                &record.metadata.description,
                &record.metadata.url,
                &record.metadata.username,
                &record.metadata.email,
                record.envelope.as_str(),
                stamp,
                &record.modified_by,
            ],
        )?;
        let id = RecordId(conn.last_insert_rowid());
        debug!(record = %id, owner = %record.owner, "record inserted");
        Ok(record.into_record(id))
    }

    fn save_record(&self, record: &VaultRecord, previous: &Envelope) -> StoreResult<()> {
        let updated = self.conn().execute(
            r#"
            UPDATE password_entries SET
                name = ?3, description = ?4, url = ?5,
                username = ?6, email = ?7, encrypted_password = ?8,
                date_created = ?9, date_last_modified = ?10, modified_by = ?11
            WHERE id = ?1 AND owner_id = ?2 AND encrypted_password = ?12
            "#,
            params![
                record.id.0,
                record.owner.0,
                &record.metadata.name,
                &record.metadata.description,
                &record.metadata.url,
                &record.metadata.username,
                &record.metadata.email,
                record.envelope.as_str(),
                record.date_created.to_rfc3339(),
                record.date_last_modified.to_rfc3339(),
                &record.modified_by,
                previous.as_str(),
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::Conflict {
                owner: record.owner,
                reason: format!("record {} was modified or removed since it was read", record.id),
            });
        }
        Ok(())
    }

    fn delete_record(&self, owner: OwnerId, id: RecordId) -> StoreResult<bool> {
        let deleted = self.conn().execute(
            "DELETE FROM password_entries WHERE id = ?1 AND owner_id = ?2",
            params![id.0, owner.0],
        )?;
        Ok(deleted == 1)
    }

    fn commit_envelopes(&self, owner: OwnerId, staged: &[StagedEnvelope]) -> StoreResult<()> {
        let mut conn = self.conn();
        // IMMEDIATE: take the write lock before reading what we compare against
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current: HashMap<i64, String> = {
            let mut stmt = tx.prepare(
                "SELECT id, encrypted_password FROM password_entries WHERE owner_id = ?1",
            )?;
            let rows = stmt.query_map([owner.0], |r| {
                Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?))
            })?;
            rows.collect::<rusqlite::Result<_>>()?
        };

        let conflict = |reason: String| StoreError::Conflict { owner, reason };

        if current.len() != staged.len() {
            return Err(conflict(format!(
                "expected {} records, found {}",
                staged.len(),
                current.len()
            )));
        }

        for entry in staged {
            match current.get(&entry.record.0) {
                Some(stored) if stored == entry.previous.as_str() => {}
                Some(_) => return Err(conflict(format!("record {} was modified", entry.record))),
                None => return Err(conflict(format!("record {} is gone", entry.record))),
            }
        }

        {
            let mut update = tx.prepare(
                "UPDATE password_entries SET encrypted_password = ?1 WHERE id = ?2 AND owner_id = ?3",
            )?;
            for entry in staged {
                update.execute(params![entry.replacement.as_str(), entry.record.0, owner.0])?;
            }
        }

        // dropping `tx` on any early return above rolls everything back
        tx.commit()?;
        info!(owner = %owner, records = staged.len(), "envelopes committed");
        Ok(())
    }
}
