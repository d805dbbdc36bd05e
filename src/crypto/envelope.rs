// src/crypto/envelope.rs
//! Envelope wire format: base64(salt ‖ nonce ‖ ciphertext)
//!
//! Fixed widths (16 + 16) and field order are a compatibility contract with
//! every envelope already in storage. Standard alphabet, padded.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::consts::{ENVELOPE_HEADER_LEN, NONCE_LEN, SALT_LEN};
use crate::crypto::cipher::Nonce;
use crate::crypto::kdf::Salt;
use crate::error::EnvelopeError;

/// Stored, textual form of one encrypted secret. Not secret itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Envelope(String);

impl Envelope {
    /// Wrap stored text as-is; validation happens on [`unpack`]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeParts {
    pub salt: Salt,
    pub nonce: Nonce,
    pub ciphertext: Vec<u8>,
}

pub fn pack(salt: &Salt, nonce: &Nonce, ciphertext: &[u8]) -> Envelope {
    let mut raw = Vec::with_capacity(ENVELOPE_HEADER_LEN + ciphertext.len());
    raw.extend_from_slice(salt);
    raw.extend_from_slice(nonce);
    raw.extend_from_slice(ciphertext);
    Envelope(STANDARD.encode(raw))
}

pub fn unpack(envelope: &Envelope) -> Result<EnvelopeParts, EnvelopeError> {
    let raw = STANDARD.decode(envelope.as_str())?;
    if raw.len() < ENVELOPE_HEADER_LEN {
        return Err(EnvelopeError::TooShort { len: raw.len() });
    }

    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&raw[..SALT_LEN]);
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&raw[SALT_LEN..ENVELOPE_HEADER_LEN]);

    Ok(EnvelopeParts {
        salt,
        nonce,
        ciphertext: raw[ENVELOPE_HEADER_LEN..].to_vec(),
    })
}
