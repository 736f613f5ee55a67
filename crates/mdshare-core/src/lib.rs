pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use error::{ErrorKind, ShareError, ShareResult};
pub use store::{DocumentId, DocumentStore, NewDocument};
pub use types::{ContentRecord, SharedDocument, SizeEstimate};

/// Length of the per-share KDF salt in bytes
pub const SALT_SIZE: usize = 16;

/// Length of the AEAD nonce in bytes
pub const NONCE_SIZE: usize = 12;

/// Length of the AEAD authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// Length of the derived symmetric key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Separator between the salt, nonce and ciphertext segments of a payload
pub const SEGMENT_DELIMITER: char = '.';

/// Path component placed before the `#` of a share URL
pub const SHARE_PATH: &str = "/s";
