// src/crypto/secret.rs
//! Seal / open a single secret under a master password
//!
//! seal:  fresh salt → derive key → encrypt (fresh nonce) → pack
//! open:  unpack → derive key from embedded salt → decrypt

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::aliases::{MasterPassword, SecretBytes};
use crate::crypto::cipher;
use crate::crypto::envelope::{pack, unpack, Envelope};
use crate::crypto::kdf::{derive_key, Salt};
use crate::entropy::{random_array, EntropySource, SystemEntropy};
use crate::error::{CipherError, EnvelopeError, Result, VaultError};

/// Seals secrets with salts and nonces drawn from an injected entropy source.
///
/// Cheap to clone and safe to share across threads; every call is
/// independent.
#[derive(Clone)]
pub struct SecretSealer {
    entropy: Arc<dyn EntropySource>,
}

impl Default for SecretSealer {
    fn default() -> Self {
        Self::new(Arc::new(SystemEntropy))
    }
}

impl SecretSealer {
    pub fn new(entropy: Arc<dyn EntropySource>) -> Self {
        Self { entropy }
    }

    pub fn seal(&self, plaintext: &[u8], master: &MasterPassword) -> Envelope {
        let salt: Salt = random_array(self.entropy.as_ref());
        let key = derive_key(master, &salt);
        let (nonce, ciphertext) = cipher::encrypt(plaintext, &key, self.entropy.as_ref());
        pack(&salt, &nonce, &ciphertext)
    }

    pub fn seal_text(&self, text: &str, master: &MasterPassword) -> Envelope {
        self.seal(text.as_bytes(), master)
    }
}

/// Seal with the system CSPRNG
pub fn seal_secret(plaintext: &[u8], master: &MasterPassword) -> Envelope {
    SecretSealer::default().seal(plaintext, master)
}

pub fn open_secret(envelope: &Envelope, master: &MasterPassword) -> Result<SecretBytes> {
    let parts = unpack(envelope)?;
    let key = derive_key(master, &parts.salt);
    cipher::decrypt(&parts.nonce, &parts.ciphertext, &key).map_err(|err| match err {
        CipherError::Length { len } => {
            VaultError::MalformedEnvelope(EnvelopeError::CiphertextLength { len })
        }
        CipherError::Padding => VaultError::InvalidMasterPassword,
    })
}

pub fn seal_text(text: &str, master: &MasterPassword) -> Envelope {
    seal_secret(text.as_bytes(), master)
}

/// Open a secret that was sealed from a UTF-8 string.
///
/// A payload that is not UTF-8 can only come from a wrong key whose garbage
/// happened to pass the padding check, so it is reported the same way.
pub fn open_text(envelope: &Envelope, master: &MasterPassword) -> Result<Zeroizing<String>> {
    let bytes = open_secret(envelope, master)?;
    std::str::from_utf8(&bytes.expose_secret()[..])
        .map(|text| Zeroizing::new(text.to_owned()))
        .map_err(|_| VaultError::InvalidMasterPassword)
}
