//! Randomness for salts and nonces

use rand::RngCore;

use crate::{NONCE_SIZE, SALT_SIZE};

/// Source of cryptographically secure random bytes.
pub trait RandomSource: Send + Sync {
    fn fill(&self, buf: &mut [u8]);
}

/// The thread-local CSPRNG, reseeded from the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) {
        rand::thread_rng().fill_bytes(buf);
    }
}

/// A fresh per-share KDF salt.
pub fn generate_salt(rng: &dyn RandomSource) -> [u8; SALT_SIZE] {
    let mut salt = [0u8; SALT_SIZE];
    rng.fill(&mut salt);
    salt
}

/// A fresh AEAD nonce. Must be called for every encryption, never reused.
pub fn generate_nonce(rng: &dyn RandomSource) -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    rng.fill(&mut nonce);
    nonce
}
