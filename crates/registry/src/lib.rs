//! Relational asset registry backed by SQLite.
//!
//! The registry is the source of truth for asset ordering. Every mutation
//! runs in a single transaction that renumbers positions and re-derives
//! the parent's primary pointer, so the two are never observably out of
//! sync.

pub mod error;
pub mod models;
pub mod ordering;
pub mod repos;
pub mod store;

pub use error::{RegistryError, RegistryResult};
pub use models::{AssetRow, ParentRow};
pub use repos::{AssetRepo, ParentRepo};
pub use store::{RegistryStore, SqliteStore};
