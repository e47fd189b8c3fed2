//! Pre-I/O upload validation.

use crate::error::{MediaError, MediaResult};
use crate::format::MediaFormat;
use bytes::Bytes;

/// A raw upload as received from the client, before any processing.
#[derive(Clone, Debug)]
pub struct RawUpload {
    pub bytes: Bytes,
    pub content_type: String,
    pub original_filename: String,
}

/// Fail-fast gate run before any I/O.
///
/// Rejects unsupported content types and raw payloads over a generous
/// pre-transform ceiling. The per-tier byte quota applies later, to the
/// transformed bytes; this ceiling only bounds what we are willing to
/// parse at all.
#[derive(Clone, Debug)]
pub struct MediaValidator {
    max_raw_size: u64,
}

impl MediaValidator {
    pub fn new(max_raw_size: u64) -> Self {
        Self { max_raw_size }
    }

    /// Validate a raw upload, returning its sniffed format.
    ///
    /// The declared content type and the magic bytes must agree; a mismatch
    /// is treated as an unsupported type rather than trusted either way.
    pub fn validate(&self, upload: &RawUpload) -> MediaResult<MediaFormat> {
        let declared = MediaFormat::from_content_type(&upload.content_type)
            .ok_or_else(|| MediaError::UnsupportedType(upload.content_type.clone()))?;

        let size = upload.bytes.len() as u64;
        if size > self.max_raw_size {
            return Err(MediaError::FileTooLarge {
                size,
                max: self.max_raw_size,
            });
        }

        let sniffed = MediaFormat::sniff_required(&upload.bytes)?;
        if sniffed != declared {
            return Err(MediaError::UnsupportedType(format!(
                "declared {} but content is {}",
                upload.content_type,
                sniffed.content_type()
            )));
        }

        Ok(sniffed)
    }
}

impl Default for MediaValidator {
    fn default() -> Self {
        Self::new(folio_core::MAX_RAW_UPLOAD_SIZE)
    }
}
