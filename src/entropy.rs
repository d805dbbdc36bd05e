// src/entropy.rs
//! Randomness for salts and nonces
//!
//! Sealing never reaches for a global RNG directly; it draws from an
//! [`EntropySource`] handed to it. [`SystemEntropy`] is the production
//! source. [`SeededEntropy`] is reproducible and only fit for tests that
//! assert on layout or length, never on secrecy.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

pub trait EntropySource: Send + Sync {
    fn fill(&self, buf: &mut [u8]);
}

/// Thread-local CSPRNG seeded from the OS — no shared state, no contention
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEntropy;

impl EntropySource for SystemEntropy {
    fn fill(&self, buf: &mut [u8]) {
        rand::rng().fill_bytes(buf);
    }
}

/// Deterministic source for reproducible test fixtures
#[derive(Debug)]
pub struct SeededEntropy(Mutex<StdRng>);

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self(Mutex::new(StdRng::seed_from_u64(seed)))
    }
}

impl EntropySource for SeededEntropy {
    fn fill(&self, buf: &mut [u8]) {
        // a poisoned lock still holds a usable generator
        let mut rng = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.fill_bytes(buf);
    }
}

pub(crate) fn random_array<const N: usize>(entropy: &dyn EntropySource) -> [u8; N] {
    let mut out = [0u8; N];
    entropy.fill(&mut out);
    out
}
