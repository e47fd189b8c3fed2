//! Database models mapping to the registry schema.

use folio_core::quota::PlanTier;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Parent content record (a "project") owning an ordered set of assets.
///
/// `primary_asset_url` is a derived cache of the position-0 asset's URL.
/// It is only ever written inside the same transaction as an ordering
/// mutation, never independently.
#[derive(Debug, Clone, FromRow)]
pub struct ParentRow {
    pub parent_id: Uuid,
    pub owner_id: Uuid,
    pub plan_tier: String,
    pub primary_asset_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl ParentRow {
    /// Parse the stored plan tier label.
    pub fn tier(&self) -> Result<PlanTier, folio_core::Error> {
        self.plan_tier.parse()
    }
}

/// Media asset record, position-ordered within its parent.
#[derive(Debug, Clone, FromRow)]
pub struct AssetRow {
    pub asset_id: Uuid,
    pub parent_id: Uuid,
    /// Contiguous 0-based position within the parent.
    pub position: i64,
    /// Public URL of the stored blob.
    pub url: String,
    /// Object-store key of the backing blob (content-addressed).
    pub object_key: String,
    pub alt_text: Option<String>,
    /// Size of the transformed (canonical) bytes.
    pub byte_size: i64,
    pub original_filename: String,
    pub content_type: String,
    pub created_at: OffsetDateTime,
}
