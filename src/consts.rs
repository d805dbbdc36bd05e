// src/consts.rs
//! Shared constants — security parameters and the envelope wire layout

/// PBKDF2-HMAC-SHA256 rounds per derived key.
// Fixed: envelopes written by earlier versions were sealed with exactly this
// count and carry no parameter header.
pub const KDF_ITERATIONS: u32 = 65_536;

/// Derived key length in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// Salt length in bytes — first field of the envelope
pub const SALT_LEN: usize = 16;

/// CBC IV length in bytes — second field of the envelope
pub const NONCE_LEN: usize = 16;

/// AES block size
pub const BLOCK_LEN: usize = 16;

/// Smallest decoded envelope that can hold salt + nonce
pub const ENVELOPE_HEADER_LEN: usize = SALT_LEN + NONCE_LEN;

/// Default SQLite store location when no config is present
pub const DEFAULT_STORE_PATH: &str = "data/password-vault.db";

/// Default config file name, overridable with `PEV_CONFIG`
pub const DEFAULT_CONFIG_FILE: &str = "vault-config.toml";
