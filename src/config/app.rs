// src/config/app.rs
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::{env, fs};

use serde::Deserialize;
use tracing::{debug, warn};

use super::defaults::*;
use crate::consts::DEFAULT_CONFIG_FILE;
use crate::error::ConfigError;
use crate::parallel::resolve_workers;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: Store,
    pub workers: Workers,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Store {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Workers {
    /// Threads for bulk decrypt and rotation; 0 = one per core
    pub decrypt_threads: usize,
}

impl Default for Store {
    fn default() -> Self {
        default_store()
    }
}

impl Default for Workers {
    fn default() -> Self {
        default_workers()
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// `PEV_VAULT_DB` overrides the configured path
    pub fn store_path(&self) -> PathBuf {
        env::var_os(ENV_VAULT_DB)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(&self.store.path))
    }

    pub fn decrypt_workers(&self) -> usize {
        resolve_workers(self.workers.decrypt_threads)
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load config once — falls back to defaults if missing or unreadable
pub fn load() -> &'static Config {
    CONFIG.get_or_init(|| {
        let config_path = env::var(ENV_CONFIG).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        read_or_default(Path::new(&config_path))
    })
}

fn read_or_default(path: &Path) -> Config {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using built-in defaults");
        return Config::default();
    }
    match Config::from_path(path) {
        Ok(conf) => conf,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring unreadable config, using built-in defaults");
            Config::default()
        }
    }
}
