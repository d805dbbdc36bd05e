// src/crypto/mod.rs
//! Envelope cryptography — no I/O, no database
//!
//! Everything here works on in-memory buffers and is stateless apart from
//! the caller-supplied entropy source.
pub mod cipher;
pub mod envelope;
pub mod kdf;
pub mod secret;

pub use cipher::Nonce;
pub use envelope::{pack, unpack, Envelope, EnvelopeParts};
pub use kdf::{derive_key, Salt};
pub use secret::{open_secret, open_text, seal_secret, seal_text, SecretSealer};
