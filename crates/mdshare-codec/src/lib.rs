//! mdshare-codec: reversible binary/text transforms for share payloads
//!
//! # Overview
//! - `deflate`: raw DEFLATE, deterministic (no header, no timestamp)
//! - `base64url`: URL-fragment-safe base64 without padding
//!
//! Nothing in this crate knows about encryption; the payload layer stacks
//! these transforms around the cipher.

pub mod base64url;
pub mod deflate;

pub use base64url::{decode_url_safe, encode_url_safe};
pub use deflate::{compress, decompress, Compressor, Deflate, MAX_INFLATED_SIZE};

use thiserror::Error;

/// Codec errors.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("compression failed: {0}")]
    CompressionFailed(String),

    #[error("corrupted compressed data: {0}")]
    CorruptedData(String),

    #[error("invalid base64url encoding: {0}")]
    InvalidEncoding(String),
}
