//! mdshare-share: password-protected share links for markdown documents
//!
//! # Overview
//! - `payload`: wire format (`salt.nonce.ciphertext` or a single plain blob) and URL helpers
//! - `record`: the `{title, markdown}` record packed inside every payload
//! - `pipeline`: seal/open over injectable primitives, with error folding
//! - `estimate`: cheap pre-flight check against the URL budget
//! - `producer`: share flow state machine (password → URL)
//! - `viewer`: viewer flow state machine (URL → content)
//!
//! Nothing here keeps state between links; every payload is self-contained.

pub mod estimate;
pub mod payload;
pub mod pipeline;
pub mod producer;
pub mod record;
pub mod viewer;

pub use estimate::SizeEstimator;
pub use payload::{assemble, extract_fragment, is_encrypted, parse, share_url, EncryptedParts};
pub use pipeline::Pipeline;
pub use producer::{ShareEvent, ShareFlow, ShareSettings, ShareState};
pub use viewer::{ViewerEvent, ViewerFlow, ViewerState};
