// src/crypto/kdf.rs
//! Master password + salt → 256-bit key

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::aliases::{DerivedKey, MasterPassword};
use crate::consts::{KDF_ITERATIONS, KEY_LEN, SALT_LEN};

pub type Salt = [u8; SALT_LEN];

/// PBKDF2-HMAC-SHA256 over the UTF-8 bytes of the password.
///
/// Deterministic and infallible. An empty password is accepted here;
/// strength policy belongs to whoever collects the password.
pub fn derive_key(master: &MasterPassword, salt: &Salt) -> DerivedKey {
    derive_with_rounds(master.expose_secret().as_bytes(), salt, KDF_ITERATIONS)
}

fn derive_with_rounds(password: &[u8], salt: &[u8], rounds: u32) -> DerivedKey {
    let mut out = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(password, salt, rounds, &mut out[..]);
    DerivedKey::new(*out)
}
