//! Media format identification.

use crate::error::{MediaError, MediaResult};

/// PNG file signature.
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// JPEG start-of-image marker.
const JPEG_SOI: [u8; 2] = [0xff, 0xd8];

/// Supported media formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaFormat {
    Png,
    Jpeg,
}

impl MediaFormat {
    /// Canonical content type served for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Map a declared content type to a format.
    ///
    /// Returns None for types outside the allowlist.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        // Strip any parameters (e.g. "image/png; charset=binary").
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Sniff the format from leading magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.len() >= PNG_SIGNATURE.len() && data[..8] == PNG_SIGNATURE {
            Some(Self::Png)
        } else if data.len() >= 2 && data[..2] == JPEG_SOI {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    /// Sniff, erroring when the magic bytes match no supported format.
    pub fn sniff_required(data: &[u8]) -> MediaResult<Self> {
        Self::sniff(data).ok_or_else(|| {
            MediaError::UnsupportedType("bytes match no supported image format".to_string())
        })
    }
}
