// src/vault.rs
//! Record lifecycle for one store: create, edit, delete, list, reveal, rotate
//!
//! Every write to an owner's records runs under that owner's lock, so a
//! rotation never races an edit made through the same vault. Listing takes
//! no lock and never decrypts anything.

use chrono::Utc;
use tracing::{debug, instrument};
use zeroize::Zeroizing;

use crate::aliases::MasterPassword;
use crate::crypto::{open_text, SecretSealer};
use crate::error::{Result, VaultError};
use crate::locks::OwnerLocks;
use crate::model::{NewRecord, OwnerId, RecordId, RecordMetadata, SortKey, VaultRecord};
use crate::parallel::map_ordered;
use crate::rotation::{rotate_vault, CancelFlag, RotationOptions, RotationReport};
use crate::store::VaultStore;

/// One record's secret from [`PasswordVault::reveal_all`]
pub type Revealed = (VaultRecord, Result<Zeroizing<String>>);

pub struct PasswordVault<S> {
    store: S,
    locks: OwnerLocks,
    sealer: SecretSealer,
    workers: usize,
}

impl<S: VaultStore> PasswordVault<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: OwnerLocks::new(),
            sealer: SecretSealer::default(),
            workers: crate::config::load().decrypt_workers(),
        }
    }

    /// Replace the entropy-backed sealer (deterministic fixtures in tests)
    pub fn with_sealer(mut self, sealer: SecretSealer) -> Self {
        self.sealer = sealer;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[instrument(skip_all, fields(owner = %owner))]
    pub fn create_record(
        &self,
        owner: OwnerId,
        metadata: RecordMetadata,
        secret: &str,
        master: &MasterPassword,
        actor: &str,
    ) -> Result<VaultRecord> {
        require_name(&metadata)?;
        let envelope = self.sealer.seal_text(secret, master);
        self.locks.with_owner(owner, || -> Result<VaultRecord> {
            Ok(self.store.insert_record(NewRecord {
                owner,
                metadata,
                envelope,
                modified_by: actor.to_string(),
                created_at: Utc::now(),
            })?)
        })
    }

    /// Replace a record's metadata, and its secret when `new_secret` is
    /// non-empty. A metadata-only edit keeps the envelope byte-for-byte.
    #[instrument(skip_all, fields(owner = %owner, record = %id))]
    pub fn update_record(
        &self,
        owner: OwnerId,
        id: RecordId,
        metadata: RecordMetadata,
        new_secret: Option<&str>,
        master: &MasterPassword,
        actor: &str,
    ) -> Result<VaultRecord> {
        require_name(&metadata)?;
        let envelope = new_secret
            .filter(|secret| !secret.is_empty())
            .map(|secret| self.sealer.seal_text(secret, master));

        self.locks.with_owner(owner, || -> Result<VaultRecord> {
            let mut record = self.owned_record(owner, id)?;
            let previous = record.envelope.clone();
            record.metadata = metadata;
            if let Some(envelope) = envelope {
                debug!("secret replaced");
                record.envelope = envelope;
            }
            record.modified_by = actor.to_string();
            record.date_last_modified = Utc::now();
            self.store.save_record(&record, &previous)?;
            Ok(record)
        })
    }

    #[instrument(skip_all, fields(owner = %owner, record = %id))]
    pub fn delete_record(&self, owner: OwnerId, id: RecordId) -> Result<()> {
        self.locks.with_owner(owner, || -> Result<()> {
            if self.store.delete_record(owner, id)? {
                Ok(())
            } else {
                Err(VaultError::RecordNotFound(id))
            }
        })
    }

    pub fn list_records(&self, owner: OwnerId, sort: SortKey) -> Result<Vec<VaultRecord>> {
        let mut records = self.store.list_records(owner)?;
        sort.sort(&mut records);
        Ok(records)
    }

    /// A record of `owner`; someone else's record reads as missing
    pub fn get_record(&self, owner: OwnerId, id: RecordId) -> Result<VaultRecord> {
        self.owned_record(owner, id)
    }

    pub fn reveal_secret(
        &self,
        owner: OwnerId,
        id: RecordId,
        master: &MasterPassword,
    ) -> Result<Zeroizing<String>> {
        let record = self.owned_record(owner, id)?;
        open_text(&record.envelope, master)
    }

    /// Decrypt every record of `owner` across worker threads, in store order.
    ///
    /// One bad record does not hide the others; each carries its own result.
    #[instrument(skip_all, fields(owner = %owner))]
    pub fn reveal_all(&self, owner: OwnerId, master: &MasterPassword) -> Result<Vec<Revealed>> {
        let records = self.store.list_records(owner)?;
        let secrets = map_ordered(&records, self.workers, |record| {
            open_text(&record.envelope, master)
        });
        debug!(records = records.len(), workers = self.workers, "revealed all");
        Ok(records.into_iter().zip(secrets).collect())
    }

    pub fn rotate_master_password(
        &self,
        owner: OwnerId,
        old: &MasterPassword,
        new: &MasterPassword,
    ) -> Result<RotationReport> {
        self.rotate_master_password_cancellable(owner, old, new, &CancelFlag::new())
    }

    pub fn rotate_master_password_cancellable(
        &self,
        owner: OwnerId,
        old: &MasterPassword,
        new: &MasterPassword,
        cancel: &CancelFlag,
    ) -> Result<RotationReport> {
        let options = RotationOptions {
            sealer: self.sealer.clone(),
            workers: self.workers,
            cancel: cancel.clone(),
        };
        rotate_vault(&self.store, &self.locks, owner, old, new, &options)
    }

    fn owned_record(&self, owner: OwnerId, id: RecordId) -> Result<VaultRecord> {
        match self.store.get_record(id)? {
            Some(record) if record.owner == owner => Ok(record),
            _ => Err(VaultError::RecordNotFound(id)),
        }
    }
}

fn require_name(metadata: &RecordMetadata) -> Result<()> {
    if metadata.name.trim().is_empty() {
        return Err(VaultError::MissingName);
    }
    Ok(())
}
