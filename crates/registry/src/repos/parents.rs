//! Parent repository trait.

use crate::error::RegistryResult;
use crate::models::ParentRow;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for parent content records.
///
/// Note the deliberate absence of a primary-pointer setter: the parent's
/// `primary_asset_url` is derived from asset order and only written inside
/// the asset mutation transactions.
#[async_trait]
pub trait ParentRepo: Send + Sync {
    /// Create a new parent.
    async fn create_parent(&self, parent: &ParentRow) -> RegistryResult<()>;

    /// Get a parent by ID.
    async fn get_parent(&self, parent_id: Uuid) -> RegistryResult<Option<ParentRow>>;

    /// Delete a parent. Its assets are destroyed by cascade; no
    /// renumbering is needed since the parent is gone.
    async fn delete_parent(&self, parent_id: Uuid) -> RegistryResult<()>;
}
