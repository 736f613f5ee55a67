//! mdshare-crypto: password-based encryption for share links
//!
//! Pipeline (producer side):
//! ```text
//! password ──PBKDF2-HMAC-SHA256 (100k rounds, 16-byte random salt)──► ShareKey (256-bit)
//! compressed record ──AES-256-GCM (key=ShareKey, nonce=random 96-bit, no AAD)──► ciphertext || tag
//! ```
//!
//! The key never leaves this crate in serialized form and is zeroized on
//! drop. Each primitive sits behind a small trait (`KeyDeriver`, `Envelope`,
//! `RandomSource`) so callers can inject deterministic or counting doubles.

pub mod envelope;
pub mod kdf;
pub mod random;

pub use envelope::{decrypt, encrypt, AesGcmEnvelope, Envelope};
pub use kdf::{derive_key, KdfParams, KeyDeriver, Pbkdf2Sha256, ShareKey, PBKDF2_ITERATIONS};
pub use random::{generate_nonce, generate_salt, OsRandom, RandomSource};

pub use mdshare_core::{KEY_SIZE, NONCE_SIZE, SALT_SIZE, TAG_SIZE};

use thiserror::Error;

/// Errors from the cryptographic layer.
///
/// `AuthenticationFailed` covers both a wrong key and a
/// tampered ciphertext; the two cannot be told apart here.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("authentication failed: wrong key or corrupted ciphertext")]
    AuthenticationFailed,

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("key derivation failed: {0}")]
    KeyDerivationFailed(String),
}
