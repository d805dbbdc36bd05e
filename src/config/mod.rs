// src/config/mod.rs
//! Configuration system for password-entry-vault
//!
//! Central, lazy-loaded global config with TOML + env overrides.
//! Security parameters (KDF rounds, envelope layout) are constants, not config.

pub use app::{load, Config, Store, Workers};
pub use defaults::{ENV_CONFIG, ENV_VAULT_DB};

mod app;
mod defaults;
