//! Packed content record
//!
//! Every payload, encrypted or not, carries the same plaintext: a JSON
//! object `{"title": "...", "markdown": "..."}`.

use mdshare_core::{ContentRecord, ShareError, ShareResult};

/// Serialize a record to the bytes that get compressed.
pub fn pack(record: &ContentRecord) -> ShareResult<Vec<u8>> {
    serde_json::to_vec(record)
        .map_err(|e| ShareError::Unknown(anyhow::anyhow!("record serialization: {e}")))
}

/// Parse decompressed bytes back into a record.
pub fn unpack(bytes: &[u8]) -> ShareResult<ContentRecord> {
    serde_json::from_slice(bytes)
        .map_err(|e| ShareError::corrupted(format!("malformed record: {e}")))
}
