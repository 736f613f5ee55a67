//! Pre-flight size estimate
//!
//! Runs the real compression of the packed record, then projects the
//! payload length without deriving a key or encrypting, so an oversized
//! document is rejected before the user sits through the KDF.

use std::sync::Arc;

use mdshare_codec::{Compressor, Deflate};
use mdshare_core::{ContentRecord, ShareError, ShareResult, SizeEstimate, TAG_SIZE};

use crate::record::pack;

/// Default URL fragment budget, conservatively below browser URL limits.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 60_000;

/// Fixed overhead added on top of the scaled compressed size.
const FIXED_OVERHEAD: usize = 50;

/// Length of the `salt.nonce.` prefix of an encrypted payload (22 + 1 + 16 + 1).
const SEGMENT_PREFIX_LEN: usize = 40;

#[derive(Clone)]
pub struct SizeEstimator {
    limit_bytes: usize,
    compressor: Arc<dyn Compressor>,
}

impl std::fmt::Debug for SizeEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SizeEstimator")
            .field("limit_bytes", &self.limit_bytes)
            .finish_non_exhaustive()
    }
}

impl Default for SizeEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAYLOAD_BYTES)
    }
}

impl SizeEstimator {
    pub fn new(limit_bytes: usize) -> Self {
        Self {
            limit_bytes,
            compressor: Arc::new(Deflate),
        }
    }

    pub fn with_compressor(mut self, compressor: Arc<dyn Compressor>) -> Self {
        self.compressor = compressor;
        self
    }

    pub fn limit_bytes(&self) -> usize {
        self.limit_bytes
    }

    /// Estimate for bare markdown (empty title).
    pub fn estimate(&self, markdown: &str) -> ShareResult<SizeEstimate> {
        self.estimate_record(&ContentRecord {
            title: String::new(),
            markdown: markdown.to_string(),
        })
    }

    /// Estimate for the full record that will be packed into the payload.
    pub fn estimate_record(&self, record: &ContentRecord) -> ShareResult<SizeEstimate> {
        let packed = pack(record)?;
        let compressed = self
            .compressor
            .compress(&packed)
            .map_err(|e| ShareError::Unknown(anyhow::anyhow!("compressing record: {e}")))?;

        let compressed_bytes = compressed.len();
        let estimated_bytes = projected_payload_len(compressed_bytes);
        let estimate = SizeEstimate {
            fits: estimated_bytes <= self.limit_bytes,
            compressed_bytes,
            word_count: word_count(&record.markdown),
            estimated_bytes,
            limit_bytes: self.limit_bytes,
        };

        tracing::debug!(
            compressed = estimate.compressed_bytes,
            estimated = estimate.estimated_bytes,
            limit = estimate.limit_bytes,
            fits = estimate.fits,
            "size estimate"
        );
        Ok(estimate)
    }

    /// Turn an estimate into the producer's `TooLarge` refusal, if it does not fit.
    pub fn check(&self, estimate: &SizeEstimate) -> ShareResult<()> {
        if estimate.fits {
            return Ok(());
        }
        Err(ShareError::TooLarge {
            estimated_bytes: estimate.estimated_bytes,
            limit_bytes: estimate.limit_bytes,
            word_count: estimate.word_count,
        })
    }
}

/// `ceil(compressed * 1.37) + 50`, floored at the exact encrypted length.
///
/// The empirical factor overshoots for anything but tiny documents; the
/// floor keeps it from undershooting when the budget is configured very
/// small.
pub fn projected_payload_len(compressed_bytes: usize) -> usize {
    let empirical = (compressed_bytes * 137).div_ceil(100) + FIXED_OVERHEAD;
    empirical.max(exact_payload_len(compressed_bytes))
}

/// Exact length of an encrypted payload whose plaintext deflates to `compressed_bytes`.
pub fn exact_payload_len(compressed_bytes: usize) -> usize {
    let ciphertext = compressed_bytes + TAG_SIZE;
    SEGMENT_PREFIX_LEN + (ciphertext * 4).div_ceil(3)
}

pub fn word_count(markdown: &str) -> usize {
    markdown.split_whitespace().count()
}
