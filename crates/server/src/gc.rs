//! Orphaned-blob reconciliation sweep.
//!
//! Compensating deletes are best-effort, so a crash or storage failure can
//! leave blobs with no registry row. The sweep lists everything under the
//! media prefix, keeps what the registry references, and deletes the rest
//! once past the grace age. The grace window protects blobs written by
//! in-flight inserts that have not yet been registered.

use crate::error::ApiResult;
use crate::metrics;
use crate::state::AppState;
use folio_core::hash::MEDIA_KEY_PREFIX;
use folio_registry::store::RegistryStore;
use folio_storage::{ObjectStore, StorageError};
use std::time::Duration;
use time::OffsetDateTime;

/// Outcome of one sweep pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Keys listed under the media prefix.
    pub scanned: u64,
    /// Unreferenced blobs deleted.
    pub deleted: u64,
    /// Unreferenced blobs younger than the grace age, left alone.
    pub kept_recent: u64,
    /// Head or delete failures (blob left for the next pass).
    pub errors: u64,
}

/// Run one reconciliation pass.
pub async fn sweep_orphaned_blobs(
    storage: &dyn ObjectStore,
    registry: &dyn RegistryStore,
    grace: Duration,
) -> ApiResult<SweepStats> {
    let keys = storage.list(MEDIA_KEY_PREFIX).await?;
    let referenced = registry.referenced_object_keys().await?;
    let cutoff = OffsetDateTime::now_utc() - time::Duration::seconds(grace.as_secs() as i64);

    let mut stats = SweepStats::default();
    for key in keys {
        stats.scanned += 1;
        if referenced.contains(&key) {
            continue;
        }

        match storage.head(&key).await {
            Ok(meta) => {
                // No modification time means we cannot prove the blob is
                // old enough; leave it for a later pass.
                let old_enough = meta.last_modified.is_some_and(|t| t <= cutoff);
                if !old_enough {
                    stats.kept_recent += 1;
                    continue;
                }
            }
            Err(StorageError::NotFound(_)) => continue,
            Err(e) => {
                stats.errors += 1;
                tracing::warn!(key, error = %e, "head failed during sweep");
                continue;
            }
        }

        match storage.delete(&key).await {
            Ok(()) => {
                stats.deleted += 1;
                metrics::ORPHANED_BLOBS_COLLECTED.inc();
                tracing::info!(key, "deleted orphaned blob");
            }
            Err(e) => {
                stats.errors += 1;
                tracing::warn!(key, error = %e, "delete failed during sweep");
            }
        }
    }

    Ok(stats)
}

/// Spawn the periodic sweep task. Does nothing when GC is disabled.
pub fn spawn_gc_task(state: AppState) -> Option<tokio::task::JoinHandle<()>> {
    if !state.config.gc.enabled {
        return None;
    }

    let interval = Duration::from_secs(state.config.gc.interval_secs);
    let grace = Duration::from_secs(state.config.gc.grace_secs);

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick fires immediately; skip it so startup does no sweep
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match sweep_orphaned_blobs(state.storage.as_ref(), state.registry.as_ref(), grace)
                .await
            {
                Ok(stats) => {
                    tracing::info!(
                        scanned = stats.scanned,
                        deleted = stats.deleted,
                        kept_recent = stats.kept_recent,
                        errors = stats.errors,
                        "orphan sweep finished"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "orphan sweep failed");
                }
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use folio_registry::models::{AssetRow, ParentRow};
    use folio_registry::{AssetRepo, ParentRepo, SqliteStore};
    use folio_storage::FilesystemBackend;
    use tempfile::tempdir;
    use uuid::Uuid;

    async fn setup() -> (tempfile::TempDir, FilesystemBackend, SqliteStore) {
        let temp = tempdir().unwrap();
        let storage = FilesystemBackend::new(temp.path().join("store")).await.unwrap();
        let registry = SqliteStore::new(temp.path().join("registry.db"))
            .await
            .unwrap();
        (temp, storage, registry)
    }

    async fn register_blob(registry: &SqliteStore, object_key: &str) {
        let now = OffsetDateTime::now_utc();
        let parent = ParentRow {
            parent_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            plan_tier: "free".to_string(),
            primary_asset_url: None,
            created_at: now,
            updated_at: now,
        };
        registry.create_parent(&parent).await.unwrap();
        let asset = AssetRow {
            asset_id: Uuid::new_v4(),
            parent_id: parent.parent_id,
            position: 0,
            url: format!("http://cdn.test/{object_key}"),
            object_key: object_key.to_string(),
            alt_text: None,
            byte_size: 2,
            original_filename: "a.png".to_string(),
            content_type: "image/png".to_string(),
            created_at: now,
        };
        registry.insert_asset(&asset, false).await.unwrap();
    }

    #[tokio::test]
    async fn deletes_old_unreferenced_blobs() {
        let (_temp, storage, registry) = setup().await;
        storage
            .put("media/ab/orphan", Bytes::from_static(b"xx"))
            .await
            .unwrap();

        let stats = sweep_orphaned_blobs(&storage, &registry, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(stats.deleted, 1);
        assert!(!storage.exists("media/ab/orphan").await.unwrap());
    }

    #[tokio::test]
    async fn keeps_referenced_blobs() {
        let (_temp, storage, registry) = setup().await;
        storage
            .put("media/ab/kept", Bytes::from_static(b"xx"))
            .await
            .unwrap();
        register_blob(&registry, "media/ab/kept").await;

        let stats = sweep_orphaned_blobs(&storage, &registry, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(stats.deleted, 0);
        assert!(storage.exists("media/ab/kept").await.unwrap());
    }

    #[tokio::test]
    async fn grace_window_protects_recent_blobs() {
        let (_temp, storage, registry) = setup().await;
        storage
            .put("media/ab/fresh", Bytes::from_static(b"xx"))
            .await
            .unwrap();

        let stats = sweep_orphaned_blobs(&storage, &registry, Duration::from_secs(3600))
            .await
            .unwrap();
        assert_eq!(stats.deleted, 0);
        assert_eq!(stats.kept_recent, 1);
        assert!(storage.exists("media/ab/fresh").await.unwrap());
    }
}
