//! Share payload wire format
//!
//! Encrypted payload (one URL fragment):
//! ```text
//! base64url(salt: 16 bytes) "." base64url(nonce: 12 bytes) "." base64url(ciphertext || tag)
//! ```
//!
//! A payload without any `.` is the unencrypted form: a single
//! `base64url(deflate(record))` blob. base64url never emits `.`, so the
//! delimiter alone decides which path a payload takes.

use mdshare_codec::{decode_url_safe, encode_url_safe};
use mdshare_core::{
    ShareError, ShareResult, NONCE_SIZE, SALT_SIZE, SEGMENT_DELIMITER, SHARE_PATH, TAG_SIZE,
};

/// The three decoded segments of an encrypted payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedParts {
    pub salt: [u8; SALT_SIZE],
    pub nonce: [u8; NONCE_SIZE],
    /// AEAD output, tag included
    pub ciphertext: Vec<u8>,
}

impl EncryptedParts {
    pub fn to_payload(&self) -> String {
        assemble(&self.salt, &self.nonce, &self.ciphertext)
    }
}

/// Join salt, nonce and ciphertext into a payload string.
pub fn assemble(salt: &[u8; SALT_SIZE], nonce: &[u8; NONCE_SIZE], ciphertext: &[u8]) -> String {
    let mut out = String::with_capacity(40 + ciphertext.len() * 4 / 3 + 4);
    out.push_str(&encode_url_safe(salt));
    out.push(SEGMENT_DELIMITER);
    out.push_str(&encode_url_safe(nonce));
    out.push(SEGMENT_DELIMITER);
    out.push_str(&encode_url_safe(ciphertext));
    out
}

/// Split an encrypted payload into its parts.
///
/// Structural problems (segment count, bad base64, wrong salt/nonce length,
/// ciphertext shorter than a tag) are reported as `Corrupted`, never as a
/// wrong password.
pub fn parse(payload: &str) -> ShareResult<EncryptedParts> {
    let segments: Vec<&str> = payload.trim().split(SEGMENT_DELIMITER).collect();
    let [salt, nonce, ciphertext] = segments.as_slice() else {
        return Err(ShareError::corrupted(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    };

    let salt = decode_segment("salt", salt)?;
    let nonce = decode_segment("nonce", nonce)?;
    let ciphertext = decode_segment("ciphertext", ciphertext)?;

    let salt: [u8; SALT_SIZE] = salt.try_into().map_err(|v: Vec<u8>| {
        ShareError::corrupted(format!("salt is {} bytes, expected {SALT_SIZE}", v.len()))
    })?;
    let nonce: [u8; NONCE_SIZE] = nonce.try_into().map_err(|v: Vec<u8>| {
        ShareError::corrupted(format!("nonce is {} bytes, expected {NONCE_SIZE}", v.len()))
    })?;
    if ciphertext.len() < TAG_SIZE {
        return Err(ShareError::corrupted(format!(
            "ciphertext is {} bytes, shorter than the {TAG_SIZE}-byte tag",
            ciphertext.len()
        )));
    }

    Ok(EncryptedParts {
        salt,
        nonce,
        ciphertext,
    })
}

fn decode_segment(name: &str, segment: &str) -> ShareResult<Vec<u8>> {
    decode_url_safe(segment).map_err(|e| ShareError::corrupted(format!("{name} segment: {e}")))
}

/// Whether a payload is the encrypted (delimited) form.
pub fn is_encrypted(payload: &str) -> bool {
    payload.contains(SEGMENT_DELIMITER)
}

/// Build the full share URL: `origin + "/s#" + payload`.
pub fn share_url(origin: &str, payload: &str) -> String {
    format!("{}{SHARE_PATH}#{payload}", origin.trim_end_matches('/'))
}

/// The payload carried by a share URL.
///
/// Accepts a full URL (everything after the first `#`), a bare `#fragment`,
/// or a bare payload pasted on its own. Returns `None` when nothing is left.
///
/// Payloads never contain `/`, so input with a `/` and no `#` is a URL
/// without a fragment, with or without a scheme.
pub fn extract_fragment(input: &str) -> Option<&str> {
    let input = input.trim();
    let fragment = match input.split_once('#') {
        Some((_, fragment)) => fragment,
        None if input.contains('/') => "",
        None => input,
    };
    let fragment = fragment.trim();
    (!fragment.is_empty()).then_some(fragment)
}
