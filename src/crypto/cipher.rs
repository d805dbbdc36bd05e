// src/crypto/cipher.rs
//! AES-256-CBC with PKCS#7 padding under a derived key
//!
//! There is no MAC. A wrong key is detected only because the padding of the
//! last block fails to validate, so [`CipherError::Padding`] must always be
//! surfaced and never swallowed.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use zeroize::Zeroizing;

use crate::aliases::{DerivedKey, SecretBytes};
use crate::consts::{BLOCK_LEN, KEY_LEN, NONCE_LEN};
use crate::entropy::{random_array, EntropySource};
use crate::error::CipherError;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

pub type Nonce = [u8; NONCE_LEN];

/// Encrypt under a fresh random IV drawn from `entropy`
pub fn encrypt(plaintext: &[u8], key: &DerivedKey, entropy: &dyn EntropySource) -> (Nonce, Vec<u8>) {
    let nonce: Nonce = random_array(entropy);
    let ciphertext = encrypt_with_nonce(plaintext, key, &nonce);
    (nonce, ciphertext)
}

pub(crate) fn encrypt_with_nonce(plaintext: &[u8], key: &DerivedKey, nonce: &Nonce) -> Vec<u8> {
    let key_bytes = key_array(key);
    Aes256CbcEnc::new(&(*key_bytes).into(), &(*nonce).into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

pub fn decrypt(nonce: &Nonce, ciphertext: &[u8], key: &DerivedKey) -> Result<SecretBytes, CipherError> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(CipherError::Length {
            len: ciphertext.len(),
        });
    }
    let key_bytes = key_array(key);
    Aes256CbcDec::new(&(*key_bytes).into(), &(*nonce).into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map(SecretBytes::new)
        .map_err(|_| CipherError::Padding)
}

fn key_array(key: &DerivedKey) -> Zeroizing<[u8; KEY_LEN]> {
    let mut out = Zeroizing::new([0u8; KEY_LEN]);
    out.copy_from_slice(&key.expose_secret()[..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::SeededEntropy;

    fn key(byte: u8) -> DerivedKey {
        DerivedKey::new([byte; KEY_LEN])
    }

    #[test]
    fn test_ciphertext_is_padded_to_block_size() {
        let entropy = SeededEntropy::new(7);
        let (_, ct) = encrypt(b"", &key(1), &entropy);
        assert_eq!(ct.len(), BLOCK_LEN);
        let (_, ct) = encrypt(&[0u8; BLOCK_LEN], &key(1), &entropy);
        assert_eq!(ct.len(), 2 * BLOCK_LEN);
    }

    #[test]
    fn test_same_key_and_plaintext_get_distinct_nonces() {
        let entropy = SeededEntropy::new(7);
        let (n1, c1) = encrypt(b"hunter2", &key(1), &entropy);
        let (n2, c2) = encrypt(b"hunter2", &key(1), &entropy);
        assert_ne!(n1, n2);
        assert_ne!(c1, c2);
    }

    #[test]
    fn test_decrypt_rejects_partial_blocks() {
        let (nonce, mut ct) = encrypt(b"secret", &key(1), &SeededEntropy::new(1));
        ct.pop();
        assert_eq!(
            decrypt(&nonce, &ct, &key(1)).err(),
            Some(CipherError::Length { len: BLOCK_LEN - 1 })
        );
        assert_eq!(
            decrypt(&nonce, &[], &key(1)).err(),
            Some(CipherError::Length { len: 0 })
        );
    }

    #[test]
    fn test_roundtrip_with_fixed_nonce() {
        let nonce = [9u8; NONCE_LEN];
        let ct = encrypt_with_nonce(b"attack at dawn", &key(3), &nonce);
        let pt = decrypt(&nonce, &ct, &key(3)).unwrap();
        assert_eq!(&pt.expose_secret()[..], b"attack at dawn");
    }
}
