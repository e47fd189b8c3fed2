//! Media pipeline error types.

use thiserror::Error;

/// Errors produced by media validation and transformation.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("unsupported media type: {0}")]
    UnsupportedType(String),

    #[error("file too large: {size} bytes (max: {max})")]
    FileTooLarge { size: u64, max: u64 },

    #[error("corrupt or unreadable media: {0}")]
    Corrupt(String),

    #[error("image dimensions {width}x{height} exceed maximum {max}")]
    DimensionsTooLarge { width: u32, height: u32, max: u32 },
}

/// Result type for media operations.
pub type MediaResult<T> = std::result::Result<T, MediaError>;
