// src/aliases.rs
//! Re-exports secure-gate's secret wrappers
//!
//! Every master password, derived key and decrypted secret in
//! password-entry-vault travels inside one of these; all zeroize on drop.

pub use secure_gate::{dynamic_alias, fixed_alias};

// Fixed-size secrets
fixed_alias!(DerivedKey, 32); // PBKDF2-HMAC-SHA256 output, AES-256 key

// Dynamic secrets
dynamic_alias!(MasterPassword, String); // human-supplied, never persisted
dynamic_alias!(SecretBytes, Vec<u8>); // decrypted envelope payload
