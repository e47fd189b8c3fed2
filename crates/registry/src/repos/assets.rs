//! Asset repository trait.

use crate::error::RegistryResult;
use crate::models::AssetRow;
use crate::ordering::OrderPlan;
use async_trait::async_trait;
use std::collections::HashSet;
use uuid::Uuid;

/// Repository for ordered asset records.
///
/// Every mutating operation runs in a single transaction that also
/// re-derives the parent's primary pointer, so the ordering invariants
/// hold at every commit point.
#[async_trait]
pub trait AssetRepo: Send + Sync {
    /// Insert an asset at the position dictated by `as_primary`: position 0
    /// (shifting the rest up) when primary or first, else appended at the
    /// end. Returns the row with its assigned position.
    async fn insert_asset(&self, asset: &AssetRow, as_primary: bool) -> RegistryResult<AssetRow>;

    /// Get an asset by ID.
    async fn get_asset(&self, asset_id: Uuid) -> RegistryResult<Option<AssetRow>>;

    /// List a parent's assets, position ascending.
    async fn list_assets(&self, parent_id: Uuid) -> RegistryResult<Vec<AssetRow>>;

    /// Count a parent's assets.
    async fn count_assets(&self, parent_id: Uuid) -> RegistryResult<u32>;

    /// Delete an asset, renumber the survivors to `0..n-2` preserving
    /// relative order, and re-derive the primary pointer. Returns the
    /// deleted row, or None if the asset did not exist.
    async fn delete_asset(&self, asset_id: Uuid) -> RegistryResult<Option<AssetRow>>;

    /// Apply a full position assignment as one atomic batch.
    ///
    /// The plan must cover exactly the parent's current assets; the
    /// transaction is rolled back (leaving the previous ordering fully
    /// intact) if any id in the plan does not match a row.
    async fn apply_order(&self, parent_id: Uuid, plan: &OrderPlan) -> RegistryResult<()>;

    /// Update an asset's alt text.
    async fn update_alt_text(
        &self,
        asset_id: Uuid,
        alt_text: Option<&str>,
    ) -> RegistryResult<AssetRow>;

    /// Count how many asset rows reference an object key. Blobs are
    /// content-addressed and may be shared between assets.
    async fn count_object_key_references(&self, object_key: &str) -> RegistryResult<u64>;

    /// All object keys referenced by any asset. Used by the orphan sweep.
    async fn referenced_object_keys(&self) -> RegistryResult<HashSet<String>>;
}
