// src/rotation/plan.rs
//! Staging and re-encryption: everything a rotation does before it writes

use tracing::debug;
use zeroize::Zeroizing;

use crate::aliases::MasterPassword;
use crate::crypto::{open_text, Envelope};
use crate::error::{Result, VaultError};
use crate::model::{RecordId, VaultRecord};
use crate::parallel::{map_ordered, resolve_workers};

use super::{RotationOptions, RotationState, Tracker};

/// One record's envelope swap, checked against `previous` at commit time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedEnvelope {
    pub record: RecordId,
    pub previous: Envelope,
    pub replacement: Envelope,
}

/// New envelopes for every record, not yet written anywhere
#[derive(Debug, Clone)]
pub struct RotationPlan {
    staged: Vec<StagedEnvelope>,
}

impl RotationPlan {
    pub(crate) fn build(
        records: &[VaultRecord],
        old: &MasterPassword,
        new: &MasterPassword,
        options: &RotationOptions,
        tracker: &mut Tracker,
    ) -> Result<Self> {
        let workers = resolve_workers(options.workers);
        let cancel = &options.cancel;

        // Staging: every record must open under the old password, as UTF-8 text
        let opened = map_ordered(records, workers, |record| {
            if cancel.is_cancelled() {
                return Err(VaultError::RotationCancelled);
            }
            open_text(&record.envelope, old)
        });

        let mut plaintexts: Vec<Zeroizing<String>> = Vec::with_capacity(records.len());
        for (record, result) in records.iter().zip(opened) {
            match result {
                Ok(secret) => plaintexts.push(secret),
                Err(VaultError::RotationCancelled) => return Err(VaultError::RotationCancelled),
                Err(cause) => {
                    return Err(VaultError::RotationAborted {
                        record: record.id,
                        cause: Box::new(cause),
                    })
                }
            }
        }
        debug!(records = plaintexts.len(), "all records staged");

        tracker.enter(RotationState::ReEncrypting);
        let pending: Vec<(&VaultRecord, Zeroizing<String>)> = records.iter().zip(plaintexts).collect();
        let sealed = map_ordered(&pending, workers, |(record, secret)| {
            if cancel.is_cancelled() {
                return None;
            }
            // fresh salt and nonce per record, never the old ones
            Some(StagedEnvelope {
                record: record.id,
                previous: record.envelope.clone(),
                replacement: options.sealer.seal_text(secret, new),
            })
        });
        drop(pending);

        sealed
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .map(|staged| Self { staged })
            .ok_or(VaultError::RotationCancelled)
    }

    pub fn staged(&self) -> &[StagedEnvelope] {
        &self.staged
    }

    pub fn record_ids(&self) -> Vec<RecordId> {
        self.staged.iter().map(|s| s.record).collect()
    }

    pub fn into_staged(self) -> Vec<StagedEnvelope> {
        self.staged
    }
}
