//! Raw DEFLATE compression
//!
//! Output carries no zlib/gzip header, so identical input always produces
//! identical bytes. Decompression insists on a complete stream: truncated
//! input, trailing garbage and oversized output are all rejected.

use flate2::write::DeflateEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use std::io::Write;

use crate::CodecError;

/// Upper bound on inflated output. A 60 KB fragment cannot legitimately
/// expand past this; anything larger is treated as a decompression bomb.
pub const MAX_INFLATED_SIZE: usize = 32 * 1024 * 1024;

/// Compression backend used by the share pipeline.
pub trait Compressor: Send + Sync {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;
}

/// The default [`Compressor`]: raw DEFLATE at best compression.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deflate;

impl Compressor for Deflate {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        compress(data)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        decompress(data)
    }
}

/// Compress `data` with raw DEFLATE.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let buf = Vec::with_capacity(data.len() / 2 + 16);
    let mut encoder = DeflateEncoder::new(buf, Compression::best());
    encoder
        .write_all(data)
        .map_err(|e| CodecError::CompressionFailed(e.to_string()))?;
    let out = encoder
        .finish()
        .map_err(|e| CodecError::CompressionFailed(e.to_string()))?;

    tracing::trace!(input = data.len(), output = out.len(), "deflate");
    Ok(out)
}

/// Decompress a raw DEFLATE stream produced by [`compress`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut inflater = Decompress::new(false);
    let mut out = Vec::with_capacity((data.len() * 4).clamp(64, MAX_INFLATED_SIZE));

    loop {
        if out.len() == out.capacity() {
            if out.len() >= MAX_INFLATED_SIZE {
                return Err(CodecError::CorruptedData(format!(
                    "inflated size exceeds {MAX_INFLATED_SIZE} bytes"
                )));
            }
            let grow = out.capacity().min(MAX_INFLATED_SIZE - out.len());
            out.reserve_exact(grow);
        }

        let (in_before, out_before) = (inflater.total_in(), inflater.total_out());
        let status = inflater
            .decompress_vec(&data[in_before as usize..], &mut out, FlushDecompress::None)
            .map_err(|e| CodecError::CorruptedData(e.to_string()))?;

        if status == Status::StreamEnd {
            break;
        }
        let stalled = inflater.total_in() == in_before && inflater.total_out() == out_before;
        // No progress with output space to spare: the input ran dry mid-stream
        if stalled && out.len() < out.capacity() {
            return Err(CodecError::CorruptedData("truncated deflate stream".to_string()));
        }
    }

    let consumed = inflater.total_in() as usize;
    if consumed != data.len() {
        return Err(CodecError::CorruptedData(format!(
            "{} trailing bytes after deflate stream",
            data.len() - consumed
        )));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_roundtrip_text() {
        let data = "# Heading\n\nSome *markdown* body text. ".repeat(50);
        let compressed = compress(data.as_bytes()).unwrap();
        assert!(compressed.len() < data.len());
        assert_eq!(decompress(&compressed).unwrap(), data.as_bytes());
    }

    #[test]
    fn test_roundtrip_empty() {
        let compressed = compress(b"").unwrap();
        assert!(!compressed.is_empty(), "even empty input has a final block");
        assert_eq!(decompress(&compressed).unwrap(), b"");
    }

    #[test]
    fn test_deterministic() {
        let data = b"same input, same bytes";
        assert_eq!(compress(data).unwrap(), compress(data).unwrap());
    }

    #[test]
    fn test_multibyte_unicode() {
        let data = "héllo wörld ✓ 日本語テキスト 🦀".repeat(20);
        let compressed = compress(data.as_bytes()).unwrap();
        let out = String::from_utf8(decompress(&compressed).unwrap()).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_block_boundary_sizes() {
        // Stored blocks top out at 65535 bytes; straddle that limit
        for size in [65_534usize, 65_535, 65_536, 65_537, 131_072] {
            let data: Vec<u8> = (0..size).map(|i| (i.wrapping_mul(131) >> 3) as u8).collect();
            let compressed = compress(&data).unwrap();
            assert_eq!(decompress(&compressed).unwrap(), data, "size {size}");
        }
    }

    #[test]
    fn test_high_ratio_markdown_roundtrip() {
        let section = "## Agenda\n\n- item one\n- item two\n- item three\n\n";
        let data = section.repeat(400);
        let compressed = compress(data.as_bytes()).unwrap();
        assert!(
            compressed.len() * 50 < data.len(),
            "expected a ratio above 50:1, got {} -> {}",
            data.len(),
            compressed.len()
        );
        assert_eq!(decompress(&compressed).unwrap(), data.as_bytes());
    }

    #[test]
    fn test_inflation_cap() {
        let data = vec![0u8; MAX_INFLATED_SIZE + 1];
        let compressed = compress(&data).unwrap();
        assert!(matches!(
            decompress(&compressed),
            Err(CodecError::CorruptedData(msg)) if msg.contains("exceeds")
        ));
    }

    #[test]
    fn test_garbage_is_corrupted() {
        let err = decompress(&[0xFF, 0xFF, 0xFF, 0xFF]).unwrap_err();
        assert!(matches!(err, CodecError::CorruptedData(_)));
    }

    #[test]
    fn test_empty_input_is_corrupted() {
        assert!(matches!(decompress(b""), Err(CodecError::CorruptedData(_))));
    }

    #[test]
    fn test_truncated_stream_is_corrupted() {
        let data = "a fairly long paragraph of text that compresses ".repeat(40);
        let compressed = compress(data.as_bytes()).unwrap();
        let truncated = &compressed[..compressed.len() / 2];
        assert!(matches!(
            decompress(truncated),
            Err(CodecError::CorruptedData(_))
        ));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut compressed = compress(b"hello").unwrap();
        compressed.extend_from_slice(b"junk");
        assert!(matches!(
            decompress(&compressed),
            Err(CodecError::CorruptedData(_))
        ));
    }

    #[test]
    fn test_trait_object_dispatch() {
        let codec: &dyn Compressor = &Deflate;
        let compressed = codec.compress(b"via the trait").unwrap();
        assert_eq!(codec.decompress(&compressed).unwrap(), b"via the trait");
    }

    proptest! {
        #[test]
        fn compress_decompress_roundtrip(
            data in proptest::collection::vec(any::<u8>(), 0..=16384),
        ) {
            let compressed = compress(&data).unwrap();
            let out = decompress(&compressed).unwrap();
            prop_assert_eq!(out, data, "round-trip must be identical");
        }

        #[test]
        fn highly_compressible_roundtrip(
            unit in "[a-z#*\\- \n]{1,24}",
            repeats in 1usize..4_000,
        ) {
            let data = unit.repeat(repeats);
            let compressed = compress(data.as_bytes()).unwrap();
            let out = decompress(&compressed).unwrap();
            prop_assert_eq!(out, data.as_bytes());
        }
    }
}
