//! tests/db_tests.rs

mod common;
mod support;

use password_entry_vault::crypto::Envelope;
use password_entry_vault::error::StoreError;
use password_entry_vault::rotation::StagedEnvelope;
use password_entry_vault::{
    open_text, seal_text, PasswordVault, SortKey, SqliteVaultStore, VaultStore,
};
use support::{master, TestVault, ALICE, BOB};

#[test]
fn test_records_survive_reopen() {
    common::setup();
    let t = TestVault::new();
    let created = t.seed(ALICE, &["persisted"], "mp");
    let path = t.db_path();

    let reopened = SqliteVaultStore::open(&path).unwrap();
    let records = reopened.list_records(ALICE).unwrap();

    assert_eq!(records, created);
    assert_eq!(
        open_text(&records[0].envelope, &master("mp")).unwrap().as_str(),
        "persisted"
    );
}

#[test]
fn test_in_memory_store_roundtrip() {
    let vault = PasswordVault::new(SqliteVaultStore::open_in_memory().unwrap()).with_workers(1);
    let record = vault
        .create_record(ALICE, password_entry_vault::RecordMetadata::named("mem"), "pw", &master("m"), "me")
        .unwrap();

    assert_eq!(vault.store().get_record(record.id).unwrap(), Some(record.clone()));
    assert!(vault.store().delete_record(ALICE, record.id).unwrap());
    assert_eq!(vault.store().get_record(record.id).unwrap(), None);
    assert!(vault.list_records(ALICE, SortKey::Name).unwrap().is_empty());
}

fn stage_all(store: &SqliteVaultStore, new_password: &str) -> Vec<StagedEnvelope> {
    store
        .list_records(ALICE)
        .unwrap()
        .into_iter()
        .map(|r| StagedEnvelope {
            record: r.id,
            replacement: seal_text("replaced", &master(new_password)),
            previous: r.envelope,
        })
        .collect()
}

#[test]
fn test_commit_rejects_modified_record() {
    let t = TestVault::new();
    t.seed(ALICE, &["one", "two"], "old");
    let store = t.vault.store();

    let mut staged = stage_all(store, "new");
    staged[1].previous = Envelope::from_text("stale");
    let before = store.list_records(ALICE).unwrap();

    let err = store.commit_envelopes(ALICE, &staged).unwrap_err();

    assert!(matches!(err, StoreError::Conflict { owner, .. } if owner == ALICE));
    assert_eq!(store.list_records(ALICE).unwrap(), before);
}

#[test]
fn test_commit_rejects_changed_record_set() {
    let t = TestVault::new();
    t.seed(ALICE, &["one", "two"], "old");
    let store = t.vault.store();
    let before = store.list_records(ALICE).unwrap();

    // a record created after staging would stay on the old password
    let staged = stage_all(store, "new");
    t.seed(ALICE, &["late arrival"], "old");
    let err = store.commit_envelopes(ALICE, &staged).unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));

    // a record staged but no longer there
    let partial = &staged[..1];
    let err = store.commit_envelopes(ALICE, partial).unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));

    let after = store.list_records(ALICE).unwrap();
    assert_eq!(&after[..2], &before[..]);
}

#[test]
fn test_commit_applies_every_envelope() {
    let t = TestVault::new();
    t.seed(ALICE, &["one", "two", "three"], "old");
    t.seed(BOB, &["bob"], "old");
    let store = t.vault.store();

    let staged = stage_all(store, "new");
    store.commit_envelopes(ALICE, &staged).unwrap();

    for record in store.list_records(ALICE).unwrap() {
        assert_eq!(open_text(&record.envelope, &master("new")).unwrap().as_str(), "replaced");
    }
    let bob = store.list_records(BOB).unwrap();
    assert_eq!(open_text(&bob[0].envelope, &master("old")).unwrap().as_str(), "bob");
}

#[test]
fn test_corrupt_timestamp_surfaces_as_store_error() {
    let t = TestVault::new();
    let record = t.seed(ALICE, &["x"], "mp").remove(0);

    let conn = rusqlite::Connection::open(t.db_path()).unwrap();
    conn.execute(
        "UPDATE password_entries SET date_created = 'yesterday' WHERE id = ?1",
        [record.id.0],
    )
    .unwrap();

    let err = t.vault.store().get_record(record.id).unwrap_err();
    assert!(matches!(err, StoreError::Timestamp(_)));
}

#[test]
fn test_stale_save_cannot_undo_rotation() {
    let t = TestVault::new();
    let record = t.seed(ALICE, &["kept"], "old").remove(0);

    // a second store on the same file reads before the rotation commits
    let other = SqliteVaultStore::open(t.db_path()).unwrap();
    let stale = other.get_record(record.id).unwrap().unwrap();
    t.vault
        .rotate_master_password(ALICE, &master("old"), &master("new"))
        .unwrap();

    let mut edited = stale.clone();
    edited.metadata.description = Some("late edit".into());
    let err = other.save_record(&edited, &stale.envelope).unwrap_err();

    assert!(matches!(err, StoreError::Conflict { owner, .. } if owner == ALICE));
    let stored = t.vault.get_record(ALICE, record.id).unwrap();
    assert_eq!(open_text(&stored.envelope, &master("new")).unwrap().as_str(), "kept");
    assert_eq!(stored.metadata.description, None);
}

#[test]
fn test_save_with_current_envelope_applies() {
    let t = TestVault::new();
    let record = t.seed(ALICE, &["kept"], "mp").remove(0);
    let store = t.vault.store();

    let mut edited = record.clone();
    edited.metadata.url = Some("https://example.org".into());
    store.save_record(&edited, &record.envelope).unwrap();

    assert_eq!(store.get_record(record.id).unwrap(), Some(edited));
}

#[test]
fn test_open_reports_uncreatable_directory() {
    let t = TestVault::new();
    let blocker = t.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let result = SqliteVaultStore::open(blocker.join("nested").join("vault.db"));

    assert!(matches!(result, Err(StoreError::Io(_))));
}
