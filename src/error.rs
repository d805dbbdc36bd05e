// src/error.rs
//! Public error types for the entire crate

use thiserror::Error;

use crate::model::{OwnerId, RecordId};

pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[from] EnvelopeError),

    #[error("invalid master password")]
    InvalidMasterPassword,

    #[error("rotation aborted: record {record} could not be decrypted ({cause})")]
    RotationAborted {
        record: RecordId,
        cause: Box<VaultError>,
    },

    #[error("rotation cancelled before commit")]
    RotationCancelled,

    #[error("storage failure: {0}")]
    StorageFailure(#[from] StoreError),

    #[error("record {0} not found")]
    RecordNotFound(RecordId),

    #[error("record name must not be blank")]
    MissingName,

    #[error("record {record} belongs to a different owner than the rest of the batch")]
    MixedOwners { record: RecordId },
}

/// Stored text that cannot be an envelope, whatever the password
#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("decoded length {len} is shorter than salt + nonce")]
    TooShort { len: usize },

    #[error("ciphertext length {len} is not a non-zero multiple of the block size")]
    CiphertextLength { len: usize },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CipherError {
    #[error("ciphertext length {len} is not a non-zero multiple of the block size")]
    Length { len: usize },

    #[error("padding validation failed")]
    Padding,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("vault of owner {owner} changed during rotation: {reason}")]
    Conflict { owner: OwnerId, reason: String },

    #[error("stored timestamp is not RFC 3339: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
