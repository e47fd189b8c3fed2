//! Canonicalizing media transformer.

use crate::error::MediaResult;
use crate::format::MediaFormat;
use crate::{jpeg, png};
use bytes::Bytes;

/// The canonical form of an uploaded media object.
#[derive(Clone, Debug)]
pub struct TransformedMedia {
    pub bytes: Bytes,
    pub format: MediaFormat,
}

impl TransformedMedia {
    /// Byte size of the canonical form. This is the size the per-tier
    /// quota is measured against.
    pub fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Normalizes uploaded bytes to a canonical encoded form.
///
/// Implementations must be pure: deterministic for identical input, no I/O.
/// Errors signal corrupt or unreadable input and abort the pipeline before
/// any storage write.
pub trait MediaTransformer: Send + Sync + 'static {
    fn transform(&self, data: &[u8]) -> MediaResult<TransformedMedia>;
}

/// The production transformer.
///
/// Sniffs the format, walks the container structure to verify integrity
/// and read dimensions, strips non-essential metadata, and emits a
/// deterministic canonical byte stream.
#[derive(Clone, Debug)]
pub struct CanonicalTransformer {
    max_dimension: u32,
}

impl CanonicalTransformer {
    pub fn new(max_dimension: u32) -> Self {
        Self { max_dimension }
    }
}

impl Default for CanonicalTransformer {
    fn default() -> Self {
        Self::new(folio_core::MAX_PIXEL_DIMENSION)
    }
}

impl MediaTransformer for CanonicalTransformer {
    fn transform(&self, data: &[u8]) -> MediaResult<TransformedMedia> {
        let format = MediaFormat::sniff_required(data)?;
        let canonical = match format {
            MediaFormat::Png => png::canonicalize(data, self.max_dimension)?,
            MediaFormat::Jpeg => jpeg::canonicalize(data, self.max_dimension)?,
        };
        Ok(TransformedMedia {
            bytes: Bytes::from(canonical),
            format,
        })
    }
}
