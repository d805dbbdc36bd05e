// tests/support.rs
//! Test fixtures — passwords, sealed records, on-disk vaults

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use password_entry_vault::crypto::SecretSealer;
use password_entry_vault::model::NewRecord;
use password_entry_vault::rotation::StagedEnvelope;
use password_entry_vault::store::StoreResult;
use password_entry_vault::{
    Envelope, MasterPassword, OwnerId, PasswordVault, RecordId, RecordMetadata, SeededEntropy,
    SqliteVaultStore, StoreError, VaultRecord, VaultStore,
};
use tempfile::TempDir;

#[allow(dead_code)]
pub const ALICE: OwnerId = OwnerId(1);
#[allow(dead_code)]
pub const BOB: OwnerId = OwnerId(2);

pub fn master(password: &str) -> MasterPassword {
    MasterPassword::new(password.to_string())
}

#[allow(dead_code)]
pub fn seeded_sealer(seed: u64) -> SecretSealer {
    SecretSealer::new(Arc::new(SeededEntropy::new(seed)))
}

/// In-memory records sealed under `password`, ids 1..=n
#[allow(dead_code)]
pub fn sealed_records(secrets: &[&str], password: &str) -> Vec<VaultRecord> {
    let sealer = SecretSealer::default();
    let master = master(password);
    let now = Utc::now();
    secrets
        .iter()
        .enumerate()
        .map(|(i, secret)| VaultRecord {
            id: RecordId(i as i64 + 1),
            owner: ALICE,
            metadata: RecordMetadata::named(format!("entry-{i}")),
            envelope: sealer.seal_text(secret, &master),
            date_created: now,
            date_last_modified: now,
            modified_by: "alice".into(),
        })
        .collect()
}

/// Cut an envelope down to `len` decoded bytes
#[allow(dead_code)]
pub fn truncate_envelope(envelope: &Envelope, len: usize) -> Envelope {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    let raw = STANDARD.decode(envelope.as_str()).expect("test envelope decodes");
    Envelope::from_text(STANDARD.encode(&raw[..len.min(raw.len())]))
}

#[allow(dead_code)]
pub fn decoded_len(envelope: &Envelope) -> usize {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    STANDARD.decode(envelope.as_str()).expect("test envelope decodes").len()
}

/// A vault over a SQLite file in its own temp directory
#[allow(dead_code)]
pub struct TestVault {
    pub vault: PasswordVault<SqliteVaultStore>,
    dir: TempDir,
}

#[allow(dead_code)]
impl TestVault {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = SqliteVaultStore::open(dir.path().join("vault.db")).expect("open store");
        Self {
            vault: PasswordVault::new(store).with_workers(4),
            dir,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("vault.db")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create `secrets` for `owner`, one record each, under `password`
    pub fn seed(&self, owner: OwnerId, secrets: &[&str], password: &str) -> Vec<VaultRecord> {
        let master = master(password);
        secrets
            .iter()
            .enumerate()
            .map(|(i, secret)| {
                self.vault
                    .create_record(
                        owner,
                        RecordMetadata::named(format!("site-{i}")),
                        secret,
                        &master,
                        "tester",
                    )
                    .expect("create record")
            })
            .collect()
    }
}

impl Default for TestVault {
    fn default() -> Self {
        Self::new()
    }
}

/// SQLite store that can refuse every commit and signal when a listing starts
#[allow(dead_code)]
pub struct HookedStore {
    inner: SqliteVaultStore,
    refuse_commits: bool,
    on_list: Mutex<Option<Sender<()>>>,
}

#[allow(dead_code)]
impl HookedStore {
    pub fn in_memory() -> Self {
        Self {
            inner: SqliteVaultStore::open_in_memory().expect("open in-memory store"),
            refuse_commits: false,
            on_list: Mutex::new(None),
        }
    }

    pub fn refusing_commits(mut self) -> Self {
        self.refuse_commits = true;
        self
    }

    /// Send once, on the first `list_records` call
    pub fn notify_on_list(self, tx: Sender<()>) -> Self {
        *self.on_list.lock().unwrap() = Some(tx);
        self
    }
}

impl VaultStore for HookedStore {
    fn list_records(&self, owner: OwnerId) -> StoreResult<Vec<VaultRecord>> {
        if let Some(tx) = self.on_list.lock().unwrap().take() {
            tx.send(()).unwrap();
        }
        self.inner.list_records(owner)
    }

    fn get_record(&self, id: RecordId) -> StoreResult<Option<VaultRecord>> {
        self.inner.get_record(id)
    }

    fn insert_record(&self, record: NewRecord) -> StoreResult<VaultRecord> {
        self.inner.insert_record(record)
    }

    fn save_record(&self, record: &VaultRecord, previous: &Envelope) -> StoreResult<()> {
        self.inner.save_record(record, previous)
    }

    fn delete_record(&self, owner: OwnerId, id: RecordId) -> StoreResult<bool> {
        self.inner.delete_record(owner, id)
    }

    fn commit_envelopes(&self, owner: OwnerId, staged: &[StagedEnvelope]) -> StoreResult<()> {
        if self.refuse_commits {
            return Err(StoreError::Conflict {
                owner,
                reason: "commit refused".into(),
            });
        }
        self.inner.commit_envelopes(owner, staged)
    }
}
