// src/lib.rs
//! password-entry-vault — the cryptographic core of a password-entry vault
//!
//! Features:
//! - PBKDF2-HMAC-SHA256 (65 536 rounds) per-record keys, fresh salt every seal
//! - AES-256-CBC envelopes: base64(salt ‖ nonce ‖ ciphertext)
//! - All-or-nothing master-password rotation across an owner's records
//! - SQLite record store, secure-gate wrappers for every secret

pub mod aliases;
pub mod config;
pub mod consts;
pub mod crypto;
pub mod db;
pub mod entropy;
pub mod error;
pub mod locks;
pub mod model;
pub mod parallel;
pub mod rotation;
pub mod store;
pub mod vault;

// Re-export everything users need at the crate root
pub use aliases::{DerivedKey, MasterPassword, SecretBytes};
pub use config::load as load_config;
pub use crypto::{open_secret, open_text, seal_secret, seal_text, Envelope, SecretSealer};
pub use db::SqliteVaultStore;
pub use entropy::{EntropySource, SeededEntropy, SystemEntropy};
pub use error::{Result, StoreError, VaultError};
pub use model::{OwnerId, RecordId, RecordMetadata, SortKey, VaultRecord};
pub use rotation::{rotate, rotate_vault, CancelFlag, RotationOptions, RotationReport, RotationState};
pub use store::VaultStore;
pub use vault::PasswordVault;
