//! URL-safe base64 (RFC 4648 §5) without padding
//!
//! The encoded form uses only `A-Z a-z 0-9 - _`, none of which are reserved
//! in a URL fragment, and never contains `.`, which the payload layer uses as
//! its segment delimiter.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::CodecError;

pub fn encode_url_safe(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode a string produced by [`encode_url_safe`].
///
/// Line breaks inserted by mail clients and trailing `=` padding are
/// dropped. The standard `+`/`/` alphabet is rejected, so every payload has
/// exactly one spelling.
pub fn decode_url_safe(s: &str) -> Result<Vec<u8>, CodecError> {
    let normalised: String = s
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let normalised = normalised.trim_end_matches('=');

    URL_SAFE_NO_PAD
        .decode(normalised.as_bytes())
        .map_err(|e| CodecError::InvalidEncoding(e.to_string()))
}
