// src/config/defaults.rs
use crate::config::app::{Store, Workers};
use crate::consts::DEFAULT_STORE_PATH;

pub const ENV_CONFIG: &str = "PEV_CONFIG";
pub const ENV_VAULT_DB: &str = "PEV_VAULT_DB";

pub fn default_store() -> Store {
    Store {
        path: DEFAULT_STORE_PATH.into(),
    }
}

pub fn default_workers() -> Workers {
    Workers { decrypt_threads: 0 }
}
