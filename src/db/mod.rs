// src/db/mod.rs
//! SQLite persistence for vault records
pub mod vault_db_conn;
pub mod vault_db_ops;

pub use vault_db_ops::SqliteVaultStore;
