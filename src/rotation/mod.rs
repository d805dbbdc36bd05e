// src/rotation/mod.rs
//! Master-password rotation for a whole vault
//!
//! Rotation is all-or-nothing. Every record is decrypted under the old
//! password before anything is re-encrypted, and nothing is written until
//! every record has a new envelope. A half-rotated vault is unrecoverable:
//! its owner only has one password to offer afterwards.
//!
//! ```text
//! Staging ──► ReEncrypting ──► Committing ──► Done
//!    │              │               │
//!    └──────────────┴───────────────┴───────► Aborted
//! ```

mod plan;

pub use plan::{RotationPlan, StagedEnvelope};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::aliases::MasterPassword;
use crate::crypto::SecretSealer;
use crate::error::{Result, VaultError};
use crate::locks::OwnerLocks;
use crate::model::{OwnerId, RecordId, VaultRecord};
use crate::store::VaultStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationState {
    Staging,
    ReEncrypting,
    Committing,
    Done,
    Aborted,
}

/// Cooperative cancellation, honoured only before Committing
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
pub struct RotationOptions {
    pub sealer: SecretSealer,
    /// Worker threads for decrypt/re-encrypt; `0` means one per core
    pub workers: usize,
    pub cancel: CancelFlag,
}

impl Default for RotationOptions {
    fn default() -> Self {
        Self {
            sealer: SecretSealer::default(),
            workers: crate::config::load().decrypt_workers(),
            cancel: CancelFlag::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationReport {
    pub state: RotationState,
    pub rotated: Vec<RecordId>,
}

/// Logs every transition of one rotation run
pub(crate) struct Tracker {
    state: RotationState,
    records: usize,
}

impl Tracker {
    fn start(records: usize) -> Self {
        debug!(records, state = ?RotationState::Staging, "rotation started");
        Self {
            state: RotationState::Staging,
            records,
        }
    }

    pub(crate) fn enter(&mut self, next: RotationState) {
        debug!(from = ?self.state, to = ?next, records = self.records, "rotation state change");
        self.state = next;
    }

    fn abort(mut self, err: VaultError) -> VaultError {
        warn!(during = ?self.state, error = %err, "rotation aborted, vault unchanged");
        self.enter(RotationState::Aborted);
        err
    }

    fn done(mut self, rotated: Vec<RecordId>) -> RotationReport {
        self.enter(RotationState::Done);
        info!(records = rotated.len(), "rotation committed");
        RotationReport {
            state: self.state,
            rotated,
        }
    }
}

/// Rotate an in-memory set of records belonging to a single owner.
///
/// On success every record's envelope is replaced; on any error the slice
/// is left untouched. A batch spanning several owners is rejected with
/// [`VaultError::MixedOwners`] before anything is decrypted.
pub fn rotate(
    records: &mut [VaultRecord],
    old: &MasterPassword,
    new: &MasterPassword,
) -> Result<RotationReport> {
    rotate_with(records, old, new, &RotationOptions::default())
}

pub fn rotate_with(
    records: &mut [VaultRecord],
    old: &MasterPassword,
    new: &MasterPassword,
    options: &RotationOptions,
) -> Result<RotationReport> {
    if let Some(stray) = stray_owner(records) {
        return Err(VaultError::MixedOwners { record: stray });
    }

    let mut tracker = Tracker::start(records.len());
    let plan = match RotationPlan::build(records, old, new, options, &mut tracker) {
        Ok(plan) => plan,
        Err(err) => return Err(tracker.abort(err)),
    };

    tracker.enter(RotationState::Committing);
    let rotated = plan.record_ids();
    // staged entries are in slice order
    for (record, staged) in records.iter_mut().zip(plan.into_staged()) {
        record.envelope = staged.replacement;
    }

    Ok(tracker.done(rotated))
}

fn stray_owner(records: &[VaultRecord]) -> Option<RecordId> {
    let owner = records.first()?.owner;
    records.iter().find(|r| r.owner != owner).map(|r| r.id)
}

/// Rotate every record `owner` has in `store`.
///
/// Holds the owner's lock from listing through commit, so no writer going
/// through the same [`OwnerLocks`] can interleave. The store's commit check
/// catches writers that bypass it.
#[instrument(skip_all, fields(owner = %owner))]
pub fn rotate_vault<S: VaultStore + ?Sized>(
    store: &S,
    locks: &OwnerLocks,
    owner: OwnerId,
    old: &MasterPassword,
    new: &MasterPassword,
    options: &RotationOptions,
) -> Result<RotationReport> {
    locks.with_owner(owner, || -> Result<RotationReport> {
        let records = store.list_records(owner)?;
        let mut tracker = Tracker::start(records.len());

        let plan = match RotationPlan::build(&records, old, new, options, &mut tracker) {
            Ok(plan) => plan,
            Err(err) => return Err(tracker.abort(err)),
        };

        tracker.enter(RotationState::Committing);
        if let Err(err) = store.commit_envelopes(owner, plan.staged()) {
            return Err(tracker.abort(VaultError::StorageFailure(err)));
        }

        Ok(tracker.done(plan.record_ids()))
    })
}
