//! Core domain types shared across the Folio crates.
//!
//! This crate defines:
//! - Plan tiers and the per-tier quota table
//! - Content hashing and object-key derivation for stored media
//! - Configuration types for the server, storage, and registry

pub mod config;
pub mod error;
pub mod hash;
pub mod quota;

pub use error::{Error, Result};
pub use hash::ContentHash;
pub use quota::{PlanTier, QuotaPolicy, QuotaTable};

/// Generous ceiling on raw (pre-transform) upload size: 25 MiB.
///
/// This is deliberately larger than any per-tier byte quota; it exists only
/// so the validator can reject absurd payloads before any I/O happens.
pub const MAX_RAW_UPLOAD_SIZE: u64 = 25 * 1024 * 1024;

/// Maximum pixel dimension (width or height) accepted by the transformer.
pub const MAX_PIXEL_DIMENSION: u32 = 16_384;
