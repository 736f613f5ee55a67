//! Seal/open over injectable primitives
//!
//! Encrypted path:
//! ```text
//! seal: record → pack → deflate → AES-GCM(PBKDF2(password, salt), nonce) → assemble
//! open: parts → PBKDF2(password, salt) → AES-GCM open → inflate → unpack → record
//! ```
//! Plain path: `record → pack → deflate → base64url` and back.
//!
//! Codec and crypto errors are folded into [`ShareError`] here, so nothing
//! lower-level reaches the flows.

use std::sync::Arc;

use mdshare_codec::{decode_url_safe, encode_url_safe, CodecError, Compressor, Deflate};
use mdshare_core::{ContentRecord, ShareError, ShareResult};
use mdshare_crypto::{
    generate_nonce, generate_salt, AesGcmEnvelope, CryptoError, Envelope, KeyDeriver, OsRandom,
    Pbkdf2Sha256, RandomSource,
};
use secrecy::SecretString;
use tracing::debug;

use crate::payload::{assemble, EncryptedParts};
use crate::record::{pack, unpack};

/// The primitives a share link is built from.
///
/// `Pipeline::default()` is the production stack; tests swap individual
/// pieces for deterministic or counting doubles. Cheap to clone.
#[derive(Clone)]
pub struct Pipeline {
    random: Arc<dyn RandomSource>,
    kdf: Arc<dyn KeyDeriver>,
    envelope: Arc<dyn Envelope>,
    compressor: Arc<dyn Compressor>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            random: Arc::new(OsRandom),
            kdf: Arc::new(Pbkdf2Sha256::default()),
            envelope: Arc::new(AesGcmEnvelope),
            compressor: Arc::new(Deflate),
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn with_kdf(mut self, kdf: Arc<dyn KeyDeriver>) -> Self {
        self.kdf = kdf;
        self
    }

    pub fn with_envelope(mut self, envelope: Arc<dyn Envelope>) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn with_compressor(mut self, compressor: Arc<dyn Compressor>) -> Self {
        self.compressor = compressor;
        self
    }

    pub fn compressor(&self) -> Arc<dyn Compressor> {
        Arc::clone(&self.compressor)
    }

    /// Compress the packed record. Shared by sealing and size estimation so
    /// both see exactly the same bytes.
    pub fn compress_record(&self, record: &ContentRecord) -> ShareResult<Vec<u8>> {
        let packed = pack(record)?;
        self.compressor
            .compress(&packed)
            .map_err(|e| ShareError::Unknown(anyhow::anyhow!("compressing record: {e}")))
    }

    /// Encrypt a record under `password`, returning the `salt.nonce.ciphertext` payload.
    ///
    /// Salt and nonce are freshly drawn on every call, so sealing the same
    /// record twice never yields the same payload. Any failure here is an
    /// environment problem and surfaces as `Unknown`.
    pub fn seal(&self, record: &ContentRecord, password: &SecretString) -> ShareResult<String> {
        let salt = generate_salt(self.random.as_ref());
        let key = self.kdf.derive(password, &salt).map_err(unknown)?;
        let compressed = self.compress_record(record)?;
        let nonce = generate_nonce(self.random.as_ref());
        let ciphertext = self
            .envelope
            .seal(&key, &nonce, &compressed)
            .map_err(unknown)?;

        let payload = assemble(&salt, &nonce, &ciphertext);
        debug!(
            compressed = compressed.len(),
            payload = payload.len(),
            "sealed share payload"
        );
        Ok(payload)
    }

    /// Decrypt parsed payload parts with `password`.
    ///
    /// A failed tag check is `WrongPassword`; a valid decryption whose
    /// contents will not inflate or unpack is `Corrupted`.
    pub fn open(
        &self,
        parts: &EncryptedParts,
        password: &SecretString,
    ) -> ShareResult<ContentRecord> {
        let key = self.kdf.derive(password, &parts.salt).map_err(unknown)?;
        let compressed = self
            .envelope
            .open(&key, &parts.nonce, &parts.ciphertext)
            .map_err(|e| match e {
                CryptoError::AuthenticationFailed => ShareError::WrongPassword,
                other => unknown(other),
            })?;
        drop(key);

        let packed = self.compressor.decompress(&compressed).map_err(corrupted)?;
        let record = unpack(&packed)?;
        debug!(bytes = packed.len(), "opened share payload");
        Ok(record)
    }

    /// Encode a record as an unencrypted payload.
    pub fn encode_plain(&self, record: &ContentRecord) -> ShareResult<String> {
        let compressed = self.compress_record(record)?;
        Ok(encode_url_safe(&compressed))
    }

    /// Decode an unencrypted payload. Every failure is `Corrupted`.
    pub fn decode_plain(&self, payload: &str) -> ShareResult<ContentRecord> {
        let compressed = decode_url_safe(payload).map_err(corrupted)?;
        let packed = self.compressor.decompress(&compressed).map_err(corrupted)?;
        unpack(&packed)
    }
}

fn unknown(e: CryptoError) -> ShareError {
    ShareError::Unknown(anyhow::Error::new(e))
}

fn corrupted(e: CodecError) -> ShareError {
    ShareError::corrupted(e.to_string())
}
