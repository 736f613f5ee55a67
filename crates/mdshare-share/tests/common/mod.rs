//! Shared doubles for the flow integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mdshare_core::{DocumentId, DocumentStore, NewDocument, NONCE_SIZE, SALT_SIZE};
use mdshare_crypto::{
    AesGcmEnvelope, CryptoError, Envelope, KdfParams, KeyDeriver, Pbkdf2Sha256, ShareKey,
};
use mdshare_share::Pipeline;
use secrecy::SecretString;

/// Cheap KDF params; the production count is exercised separately.
pub const FAST_KDF: KdfParams = KdfParams { iterations: 1_000 };

pub fn fast_pipeline() -> Pipeline {
    Pipeline::default().with_kdf(Arc::new(Pbkdf2Sha256::new(FAST_KDF)))
}

/// KDF double that counts invocations.
pub struct CountingKdf {
    inner: Pbkdf2Sha256,
    pub calls: AtomicUsize,
}

impl CountingKdf {
    pub fn new() -> Self {
        Self {
            inner: Pbkdf2Sha256::new(FAST_KDF),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl KeyDeriver for CountingKdf {
    fn derive(
        &self,
        password: &SecretString,
        salt: &[u8; SALT_SIZE],
    ) -> Result<ShareKey, CryptoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.derive(password, salt)
    }
}

/// Envelope double that counts seal/open calls.
#[derive(Default)]
pub struct CountingEnvelope {
    pub seals: AtomicUsize,
    pub opens: AtomicUsize,
}

impl CountingEnvelope {
    pub fn seal_count(&self) -> usize {
        self.seals.load(Ordering::SeqCst)
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl Envelope for CountingEnvelope {
    fn seal(
        &self,
        key: &ShareKey,
        nonce: &[u8; NONCE_SIZE],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        self.seals.fetch_add(1, Ordering::SeqCst);
        AesGcmEnvelope.seal(key, nonce, plaintext)
    }

    fn open(
        &self,
        key: &ShareKey,
        nonce: &[u8; NONCE_SIZE],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        AesGcmEnvelope.open(key, nonce, ciphertext)
    }
}

/// Envelope whose encryption always fails, standing in for a broken platform.
pub struct BrokenEnvelope;

impl Envelope for BrokenEnvelope {
    fn seal(&self, _: &ShareKey, _: &[u8; NONCE_SIZE], _: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError::EncryptionFailed("cipher unavailable".into()))
    }

    fn open(&self, _: &ShareKey, _: &[u8; NONCE_SIZE], _: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Err(CryptoError::EncryptionFailed("cipher unavailable".into()))
    }
}

/// In-memory document store.
#[derive(Default)]
pub struct MemoryStore {
    pub docs: Vec<(DocumentId, NewDocument)>,
}

impl DocumentStore for MemoryStore {
    fn create_document(&mut self, doc: NewDocument) -> anyhow::Result<DocumentId> {
        let id = DocumentId(format!("doc-{}", self.docs.len() + 1));
        self.docs.push((id.clone(), doc));
        Ok(id)
    }
}

/// Deterministic, poorly compressible prose: `words` words of 8 letters.
pub fn noisy_words(words: usize) -> String {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut out = String::with_capacity(words * 9);
    for i in 0..words {
        if i > 0 {
            out.push(' ');
        }
        for _ in 0..8 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            out.push((b'a' + (state % 26) as u8) as char);
        }
    }
    out
}

/// Realistic, highly compressible markdown: repeated headings, lists and prose.
pub fn meeting_notes(sections: usize) -> String {
    let mut out = String::from("# Weekly sync\n\n");
    for i in 0..sections {
        out.push_str(&format!("## Topic {i}\n\n"));
        out.push_str("- **Owner**: platform team\n");
        out.push_str("- Status: in progress, see the tracking board\n");
        out.push_str("- [ ] follow up with design on the open questions\n\n");
        out.push_str("Discussion went over the rollout plan and the remaining risks. ");
        out.push_str("Everyone agreed to revisit this next week.\n\n");
    }
    out
}

pub fn secret(s: &str) -> SecretString {
    SecretString::from(s)
}
