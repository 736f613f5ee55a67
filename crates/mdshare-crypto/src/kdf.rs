//! Key derivation: PBKDF2-HMAC-SHA256 password → share key

use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::{CryptoError, KEY_SIZE, SALT_SIZE};

/// PBKDF2 work factor for every share link.
///
/// Not carried in the payload: changing it makes existing links undecryptable.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// A 256-bit AEAD key derived from a share password.
///
/// Zeroized on drop to prevent secrets lingering in memory.
pub struct ShareKey {
    bytes: [u8; KEY_SIZE],
}

impl ShareKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for ShareKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for ShareKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// PBKDF2 parameters for KDF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// HMAC-SHA256 rounds (default: 100,000)
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: PBKDF2_ITERATIONS,
        }
    }
}

/// Turns a password and salt into a [`ShareKey`].
pub trait KeyDeriver: Send + Sync {
    fn derive(
        &self,
        password: &SecretString,
        salt: &[u8; SALT_SIZE],
    ) -> Result<ShareKey, CryptoError>;
}

/// The production [`KeyDeriver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Pbkdf2Sha256 {
    pub params: KdfParams,
}

impl Pbkdf2Sha256 {
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }
}

impl KeyDeriver for Pbkdf2Sha256 {
    fn derive(
        &self,
        password: &SecretString,
        salt: &[u8; SALT_SIZE],
    ) -> Result<ShareKey, CryptoError> {
        derive_key(password, salt, &self.params)
    }
}

/// Derive a 256-bit share key from a password and salt using PBKDF2-HMAC-SHA256.
///
/// The salt should be 16 bytes, randomly generated per share and carried in
/// the payload (it does not need to be secret). Nothing is cached: every call
/// pays the full work factor.
pub fn derive_key(
    password: &SecretString,
    salt: &[u8; SALT_SIZE],
    params: &KdfParams,
) -> Result<ShareKey, CryptoError> {
    if params.iterations == 0 {
        return Err(CryptoError::KeyDerivationFailed(
            "iteration count must be non-zero".to_string(),
        ));
    }

    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(
        password.expose_secret().as_bytes(),
        salt,
        params.iterations,
        &mut key,
    );

    tracing::debug!(iterations = params.iterations, "derived share key");
    Ok(ShareKey::from_bytes(key))
}
