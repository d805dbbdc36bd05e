// src/locks.rs
//! Per-owner exclusive locks
//!
//! Writers to an owner's vault (create, update, delete, rotation) run under
//! that owner's lock. Reads never take it. Different owners never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::model::OwnerId;

#[derive(Debug, Default)]
pub struct OwnerLocks {
    slots: Mutex<HashMap<OwnerId, Arc<Mutex<()>>>>,
}

impl OwnerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the exclusive lock for `owner`
    pub fn with_owner<R>(&self, owner: OwnerId, f: impl FnOnce() -> R) -> R {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(owner).or_default())
        };
        // the guarded value is (); poisoning carries no broken state
        let _held = slot.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }
}
