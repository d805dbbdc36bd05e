// src/store.rs
//! The record store this crate writes through
//!
//! Storage technology is the caller's choice; [`crate::db::SqliteVaultStore`]
//! is the bundled implementation.

use crate::crypto::Envelope;
use crate::error::StoreError;
use crate::model::{NewRecord, OwnerId, RecordId, VaultRecord};
use crate::rotation::StagedEnvelope;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub trait VaultStore: Send + Sync {
    fn list_records(&self, owner: OwnerId) -> StoreResult<Vec<VaultRecord>>;

    fn get_record(&self, id: RecordId) -> StoreResult<Option<VaultRecord>>;

    fn insert_record(&self, record: NewRecord) -> StoreResult<VaultRecord>;

    /// Overwrite an existing record in full, but only while its stored
    /// envelope is still `previous`.
    ///
    /// A record whose envelope changed since it was read (a rotation
    /// committed in between) is left alone and reported as
    /// [`StoreError::Conflict`], so a stale writer can never put an
    /// old-password envelope back.
    fn save_record(&self, record: &VaultRecord, previous: &Envelope) -> StoreResult<()>;

    /// `false` when no such record belongs to `owner`
    fn delete_record(&self, owner: OwnerId, id: RecordId) -> StoreResult<bool>;

    /// Swap in every staged envelope for `owner`, or none of them.
    ///
    /// Implementations must reject the batch unless the owner's record set,
    /// and each record's current envelope, still match what was staged.
    /// A rejected or failed batch leaves the store exactly as it was.
    fn commit_envelopes(&self, owner: OwnerId, staged: &[StagedEnvelope]) -> StoreResult<()>;
}
