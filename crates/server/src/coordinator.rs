//! Cross-store consistency coordination.
//!
//! The coordinator owns the multi-step mutation pipelines that span the
//! blob store and the registry. The registry is the source of truth: a
//! blob write that never gets registered is an orphan (reconciled by the
//! sweep), never a visible asset. All mutations for one parent run under
//! that parent's lock; reads take no lock.

use crate::error::{ApiError, ApiResult};
use crate::locks::{BlobLocks, ParentLocks};
use crate::metrics;
use bytes::Bytes;
use folio_core::config::AppConfig;
use folio_core::{ContentHash, PlanTier, QuotaPolicy};
use folio_media::{MediaTransformer, MediaValidator, RawUpload, TransformedMedia};
use folio_registry::models::{AssetRow, ParentRow};
use folio_registry::ordering;
use folio_registry::store::RegistryStore;
use folio_storage::{ObjectStore, put_with_retry, with_timeout};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

/// Coordinates validate, transform, store, and register across backends.
pub struct ConsistencyCoordinator {
    config: Arc<AppConfig>,
    storage: Arc<dyn ObjectStore>,
    registry: Arc<dyn RegistryStore>,
    validator: MediaValidator,
    transformer: Arc<dyn MediaTransformer>,
    locks: ParentLocks,
    blob_locks: BlobLocks,
}

impl ConsistencyCoordinator {
    pub fn new(
        config: Arc<AppConfig>,
        storage: Arc<dyn ObjectStore>,
        registry: Arc<dyn RegistryStore>,
        transformer: Arc<dyn MediaTransformer>,
        locks: ParentLocks,
        blob_locks: BlobLocks,
    ) -> Self {
        Self {
            config,
            storage,
            registry,
            validator: MediaValidator::default(),
            transformer,
            locks,
            blob_locks,
        }
    }

    /// Create a parent record.
    pub async fn create_parent(&self, owner_id: Uuid, tier: PlanTier) -> ApiResult<ParentRow> {
        let now = OffsetDateTime::now_utc();
        let parent = ParentRow {
            parent_id: Uuid::new_v4(),
            owner_id,
            plan_tier: tier.as_str().to_string(),
            primary_asset_url: None,
            created_at: now,
            updated_at: now,
        };
        self.registry.create_parent(&parent).await?;
        Ok(parent)
    }

    /// Get a parent record.
    pub async fn get_parent(&self, parent_id: Uuid) -> ApiResult<ParentRow> {
        self.registry
            .get_parent(parent_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("parent {parent_id} not found")))
    }

    /// Delete a parent and its assets, then release unreferenced blobs.
    pub async fn delete_parent(&self, parent_id: Uuid) -> ApiResult<()> {
        let _guard = self.locks.acquire(parent_id).await;

        let assets = self.registry.list_assets(parent_id).await?;
        self.registry.delete_parent(parent_id).await?;

        // Rows are gone by cascade; blob cleanup is best-effort.
        for asset in assets {
            self.release_blob(&asset.object_key).await;
        }
        Ok(())
    }

    /// List a parent's assets in position order.
    pub async fn list_assets(&self, parent_id: Uuid) -> ApiResult<Vec<AssetRow>> {
        self.get_parent(parent_id).await?;
        Ok(self.registry.list_assets(parent_id).await?)
    }

    /// Get a single asset.
    pub async fn get_asset(&self, asset_id: Uuid) -> ApiResult<AssetRow> {
        self.registry
            .get_asset(asset_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("asset {asset_id} not found")))
    }

    /// The full insert pipeline: validate, transform, quota-check, store,
    /// register.
    ///
    /// Validation and transformation run before any lock or I/O so invalid
    /// uploads are rejected at zero cost. The quota count read under the
    /// parent lock is the authoritative one; the earlier read only short-
    /// circuits obviously-full parents before the transform burns CPU.
    #[instrument(skip(self, upload, alt_text), fields(parent_id = %parent_id, size = upload.bytes.len()))]
    pub async fn insert_asset(
        &self,
        parent_id: Uuid,
        upload: RawUpload,
        as_primary: bool,
        alt_text: Option<String>,
    ) -> ApiResult<AssetRow> {
        let parent = self.get_parent(parent_id).await?;
        let tier = parent.tier()?;
        let policy = self.config.quotas.policy(tier);

        self.validator.validate(&upload)?;

        let count = self.registry.count_assets(parent_id).await?;
        self.check_asset_quota(tier, policy, count)?;

        let transformed = self.transform(upload.bytes.clone()).await?;
        if transformed.byte_size() > policy.max_bytes {
            return Err(ApiError::Media(folio_media::MediaError::FileTooLarge {
                size: transformed.byte_size(),
                max: policy.max_bytes,
            }));
        }

        let hash = ContentHash::compute(&transformed.bytes);
        let object_key = hash.object_key();
        let url = self.config.server.media_url(&object_key);
        let timeout = self.config.server.storage_timeout();

        let _guard = self.locks.acquire(parent_id).await;

        let count = self.registry.count_assets(parent_id).await?;
        self.check_asset_quota(tier, policy, count)?;

        // Held across put and register so a concurrent release of the same
        // content-addressed key cannot delete the blob between the write and
        // the row commit.
        let _blob_guard = self.blob_locks.acquire(object_key.clone()).await;

        put_with_retry(
            self.storage.as_ref(),
            &object_key,
            transformed.bytes.clone(),
            self.config.server.put_retry_attempts,
            timeout,
        )
        .await?;

        let row = AssetRow {
            asset_id: Uuid::new_v4(),
            parent_id,
            position: 0,
            url,
            object_key: object_key.clone(),
            alt_text,
            byte_size: transformed.byte_size() as i64,
            original_filename: upload.original_filename,
            content_type: transformed.format.content_type().to_string(),
            created_at: OffsetDateTime::now_utc(),
        };

        match self.registry.insert_asset(&row, as_primary).await {
            Ok(inserted) => {
                metrics::ASSETS_INSERTED.inc();
                Ok(inserted)
            }
            Err(e) => {
                tracing::warn!(
                    object_key,
                    error = %e,
                    "registration failed after blob write, compensating"
                );
                metrics::COMPENSATING_DELETES.inc();
                // The blob guard is still held here
                self.release_blob_locked(&object_key).await;
                Err(e.into())
            }
        }
    }

    /// Delete an asset. The registry row and renumbering commit first; the
    /// blob delete is best-effort and never fails the request once the row
    /// is gone (the orphan sweep reconciles any leftover).
    #[instrument(skip(self))]
    pub async fn delete_asset(&self, asset_id: Uuid) -> ApiResult<AssetRow> {
        let asset = self.get_asset(asset_id).await?;
        let _guard = self.locks.acquire(asset.parent_id).await;

        let deleted = self
            .registry
            .delete_asset(asset_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("asset {asset_id} not found")))?;

        self.release_blob(&deleted.object_key).await;
        metrics::ASSETS_DELETED.inc();
        Ok(deleted)
    }

    /// Atomically apply a caller-supplied order to a parent's assets.
    ///
    /// The requested ids must be exactly a permutation of the parent's
    /// current assets; anything else is rejected without touching the
    /// stored order. Returns the assets in their new order.
    #[instrument(skip(self, requested), fields(parent_id = %parent_id, count = requested.len()))]
    pub async fn reorder_assets(
        &self,
        parent_id: Uuid,
        requested: &[Uuid],
    ) -> ApiResult<Vec<AssetRow>> {
        let _guard = self.locks.acquire(parent_id).await;
        self.get_parent(parent_id).await?;

        let current: Vec<Uuid> = self
            .registry
            .list_assets(parent_id)
            .await?
            .into_iter()
            .map(|row| row.asset_id)
            .collect();

        let plan = ordering::reorder_plan(&current, requested).map_err(ApiError::InvalidReorder)?;
        self.registry.apply_order(parent_id, &plan).await?;
        metrics::REORDERS_APPLIED.inc();

        Ok(self.registry.list_assets(parent_id).await?)
    }

    /// Update an asset's alt text. Ordering is untouched, so no lock.
    pub async fn update_alt_text(
        &self,
        asset_id: Uuid,
        alt_text: Option<&str>,
    ) -> ApiResult<AssetRow> {
        Ok(self.registry.update_alt_text(asset_id, alt_text).await?)
    }

    fn check_asset_quota(&self, tier: PlanTier, policy: QuotaPolicy, count: u32) -> ApiResult<()> {
        if count >= policy.max_assets {
            metrics::QUOTA_REJECTIONS.inc();
            return Err(ApiError::QuotaExceeded {
                tier: tier.as_str().to_string(),
                limit: policy.max_assets,
                current: count,
            });
        }
        Ok(())
    }

    /// Run the pure transformer on a blocking thread.
    async fn transform(&self, data: Bytes) -> ApiResult<TransformedMedia> {
        let transformer = self.transformer.clone();
        tokio::task::spawn_blocking(move || transformer.transform(&data))
            .await
            .map_err(|e| ApiError::Internal(format!("transform task failed: {e}")))?
            .map_err(ApiError::from)
    }

    /// Delete a blob if no registry row references it any more.
    ///
    /// Takes the blob lock so the reference count cannot race a concurrent
    /// insert of identical content on another parent: without it the count
    /// could read zero after that insert's put but before its row commits,
    /// and the delete would leave the committed row pointing at nothing.
    async fn release_blob(&self, object_key: &str) {
        let _blob_guard = self.blob_locks.acquire(object_key.to_string()).await;
        self.release_blob_locked(object_key).await;
    }

    /// Release body; the caller must hold the blob lock for `object_key`.
    ///
    /// Failures are logged and counted, never propagated: the registry has
    /// already committed and the sweep will pick the blob up later.
    async fn release_blob_locked(&self, object_key: &str) {
        match self.registry.count_object_key_references(object_key).await {
            Ok(0) => {
                let timeout = self.config.server.storage_timeout();
                if let Err(e) = with_timeout(timeout, self.storage.delete(object_key)).await {
                    metrics::BLOB_DELETE_FAILURES.inc();
                    tracing::warn!(object_key, error = %e, "blob delete failed, sweep will reconcile");
                }
            }
            Ok(refs) => {
                tracing::debug!(object_key, refs, "blob still referenced, keeping");
            }
            Err(e) => {
                metrics::BLOB_DELETE_FAILURES.inc();
                tracing::warn!(object_key, error = %e, "reference count failed, leaving blob for sweep");
            }
        }
    }
}
