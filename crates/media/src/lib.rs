//! Media validation and canonicalization for Folio.
//!
//! This crate provides:
//! - [`MediaValidator`]: the cheapest possible fail-fast gate, run before
//!   any I/O (content-type allowlist, magic-byte sniffing, raw-size ceiling)
//! - [`MediaTransformer`]: pure, deterministic canonicalization of uploaded
//!   bytes (container-structure verification and metadata stripping)
//!
//! No raster codec is involved: canonicalization operates on the container
//! structure (PNG chunks, JPEG segments), which is enough to verify
//! integrity, read dimensions, and strip non-essential metadata.

pub mod error;
pub mod format;
mod jpeg;
mod png;
pub mod transform;
pub mod validate;

pub use error::{MediaError, MediaResult};
pub use format::MediaFormat;
pub use transform::{CanonicalTransformer, MediaTransformer, TransformedMedia};
pub use validate::{MediaValidator, RawUpload};
