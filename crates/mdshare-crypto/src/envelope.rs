//! AES-256-GCM envelope encryption/decryption
//!
//! Ciphertext format (binary, before base64url):
//! ```text
//! [N bytes: ciphertext][16 bytes: GCM tag]
//! ```
//!
//! The nonce is not embedded here; the payload layer carries it as its own
//! segment. No associated data is bound.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};

use crate::kdf::ShareKey;
use crate::{CryptoError, NONCE_SIZE, TAG_SIZE};

/// Authenticated symmetric cipher used for share payloads.
pub trait Envelope: Send + Sync {
    fn seal(
        &self,
        key: &ShareKey,
        nonce: &[u8; NONCE_SIZE],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;
    fn open(
        &self,
        key: &ShareKey,
        nonce: &[u8; NONCE_SIZE],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;
}

/// The production [`Envelope`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AesGcmEnvelope;

impl Envelope for AesGcmEnvelope {
    fn seal(
        &self,
        key: &ShareKey,
        nonce: &[u8; NONCE_SIZE],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        encrypt(plaintext, key, nonce)
    }

    fn open(
        &self,
        key: &ShareKey,
        nonce: &[u8; NONCE_SIZE],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        decrypt(ciphertext, key, nonce)
    }
}

/// Encrypt `plaintext` with AES-256-GCM.
///
/// Returns: `[ciphertext][16-byte tag]`
pub fn encrypt(
    plaintext: &[u8],
    key: &ShareKey,
    nonce: &[u8; NONCE_SIZE],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
}

/// Decrypt `[ciphertext][16-byte tag]` with AES-256-GCM.
pub fn decrypt(
    ciphertext: &[u8],
    key: &ShareKey,
    nonce: &[u8; NONCE_SIZE],
) -> Result<Vec<u8>, CryptoError> {
    if ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::AuthenticationFailed);
    }

    let cipher = Aes256Gcm::new(key.as_bytes().into());

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailed)
}
