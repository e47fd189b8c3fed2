//! Registry store trait and SQLite implementation.

use crate::error::{RegistryError, RegistryResult};
use crate::repos::{AssetRepo, ParentRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined registry store trait.
#[async_trait]
pub trait RegistryStore: ParentRepo + AssetRepo + Send + Sync {
    /// Run database migrations.
    async fn migrate(&self) -> RegistryResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> RegistryResult<()>;
}

/// Registry schema.
///
/// The UNIQUE(parent_id, position) index enforces position uniqueness at
/// the database level; renumbering inside transactions uses a two-phase
/// sign-flip so the constraint never observes a transient duplicate.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS parents (
    parent_id BLOB PRIMARY KEY,
    owner_id BLOB NOT NULL,
    plan_tier TEXT NOT NULL,
    primary_asset_url TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS assets (
    asset_id BLOB PRIMARY KEY,
    parent_id BLOB NOT NULL REFERENCES parents(parent_id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    url TEXT NOT NULL,
    object_key TEXT NOT NULL,
    alt_text TEXT,
    byte_size INTEGER NOT NULL,
    original_filename TEXT NOT NULL,
    content_type TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (parent_id, position)
);

CREATE INDEX IF NOT EXISTS idx_assets_object_key ON assets(object_key);
"#;

/// SQLite-based registry store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Create a new SQLite store and apply the schema.
    pub async fn new(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RegistryError::Internal(format!("create db directory: {e}")))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // SQLite permits limited write concurrency; a single connection
            // avoids persistent "database is locked" failures under load.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl RegistryStore for SqliteStore {
    async fn migrate(&self) -> RegistryResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> RegistryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

mod sqlite_impl {
    use super::*;
    use crate::models::{AssetRow, ParentRow};
    use crate::ordering::{self, OrderPlan};
    use std::collections::HashSet;
    use time::OffsetDateTime;
    use tracing::instrument;
    use uuid::Uuid;

    /// Re-derive the parent's primary pointer from the position-0 asset.
    ///
    /// Runs inside the caller's transaction so the pointer can never be
    /// observed out of sync with the ordering.
    async fn sync_primary(
        conn: &mut sqlx::SqliteConnection,
        parent_id: Uuid,
        now: OffsetDateTime,
    ) -> RegistryResult<()> {
        let url: Option<String> = sqlx::query_scalar(
            "SELECT url FROM assets WHERE parent_id = ? ORDER BY position LIMIT 1",
        )
        .bind(parent_id)
        .fetch_optional(&mut *conn)
        .await?;

        let result =
            sqlx::query("UPDATE parents SET primary_asset_url = ?, updated_at = ? WHERE parent_id = ?")
                .bind(&url)
                .bind(now)
                .bind(parent_id)
                .execute(&mut *conn)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::NotFound(format!(
                "parent {parent_id} not found"
            )));
        }
        Ok(())
    }

    /// Apply final positions via two-phase sign-flip: first park every
    /// targeted row at `-(target) - 2` (negative, so no collision with any
    /// live position), then flip all parked rows to their targets in one
    /// statement. Returns an error if any id fails to match exactly one row.
    async fn park_positions(
        conn: &mut sqlx::SqliteConnection,
        parent_id: Uuid,
        positions: &[(Uuid, i64)],
    ) -> RegistryResult<()> {
        for (asset_id, target) in positions {
            let result =
                sqlx::query("UPDATE assets SET position = ? WHERE asset_id = ? AND parent_id = ?")
                    .bind(-target - 2)
                    .bind(asset_id)
                    .bind(parent_id)
                    .execute(&mut *conn)
                    .await?;
            if result.rows_affected() != 1 {
                return Err(RegistryError::Constraint(format!(
                    "asset {asset_id} does not belong to parent {parent_id}"
                )));
            }
        }
        Ok(())
    }

    async fn unpark_positions(
        conn: &mut sqlx::SqliteConnection,
        parent_id: Uuid,
    ) -> RegistryResult<()> {
        sqlx::query(
            "UPDATE assets SET position = -position - 2 WHERE parent_id = ? AND position < 0",
        )
        .bind(parent_id)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    #[async_trait]
    impl ParentRepo for SqliteStore {
        async fn create_parent(&self, parent: &ParentRow) -> RegistryResult<()> {
            if self.get_parent(parent.parent_id).await?.is_some() {
                return Err(RegistryError::AlreadyExists(format!(
                    "parent {} already exists",
                    parent.parent_id
                )));
            }

            sqlx::query(
                r#"
                INSERT INTO parents (parent_id, owner_id, plan_tier, primary_asset_url, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(parent.parent_id)
            .bind(parent.owner_id)
            .bind(&parent.plan_tier)
            .bind(&parent.primary_asset_url)
            .bind(parent.created_at)
            .bind(parent.updated_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn get_parent(&self, parent_id: Uuid) -> RegistryResult<Option<ParentRow>> {
            let row = sqlx::query_as::<_, ParentRow>("SELECT * FROM parents WHERE parent_id = ?")
                .bind(parent_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn delete_parent(&self, parent_id: Uuid) -> RegistryResult<()> {
            let result = sqlx::query("DELETE FROM parents WHERE parent_id = ?")
                .bind(parent_id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(RegistryError::NotFound(format!(
                    "parent {parent_id} not found"
                )));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl AssetRepo for SqliteStore {
        #[instrument(skip(self, asset), fields(asset_id = %asset.asset_id, parent_id = %asset.parent_id))]
        async fn insert_asset(
            &self,
            asset: &AssetRow,
            as_primary: bool,
        ) -> RegistryResult<AssetRow> {
            let mut tx = self.pool.begin().await?;

            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assets WHERE parent_id = ?")
                .bind(asset.parent_id)
                .fetch_one(&mut *tx)
                .await?;

            let placement = ordering::placement(count as u32, as_primary);
            if placement.shift_existing {
                // Shift every existing position up by one: park at
                // -(p + 2), then flip to -(parked) - 1 = p + 1.
                sqlx::query("UPDATE assets SET position = -position - 2 WHERE parent_id = ?")
                    .bind(asset.parent_id)
                    .execute(&mut *tx)
                    .await?;
                sqlx::query(
                    "UPDATE assets SET position = -position - 1 WHERE parent_id = ? AND position < 0",
                )
                .bind(asset.parent_id)
                .execute(&mut *tx)
                .await?;
            }

            let mut inserted = asset.clone();
            inserted.position = placement.position;

            sqlx::query(
                r#"
                INSERT INTO assets (
                    asset_id, parent_id, position, url, object_key, alt_text,
                    byte_size, original_filename, content_type, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(inserted.asset_id)
            .bind(inserted.parent_id)
            .bind(inserted.position)
            .bind(&inserted.url)
            .bind(&inserted.object_key)
            .bind(&inserted.alt_text)
            .bind(inserted.byte_size)
            .bind(&inserted.original_filename)
            .bind(&inserted.content_type)
            .bind(inserted.created_at)
            .execute(&mut *tx)
            .await?;

            sync_primary(&mut tx, inserted.parent_id, OffsetDateTime::now_utc()).await?;

            tx.commit().await?;
            Ok(inserted)
        }

        async fn get_asset(&self, asset_id: Uuid) -> RegistryResult<Option<AssetRow>> {
            let row = sqlx::query_as::<_, AssetRow>("SELECT * FROM assets WHERE asset_id = ?")
                .bind(asset_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn list_assets(&self, parent_id: Uuid) -> RegistryResult<Vec<AssetRow>> {
            let rows = sqlx::query_as::<_, AssetRow>(
                "SELECT * FROM assets WHERE parent_id = ? ORDER BY position",
            )
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn count_assets(&self, parent_id: Uuid) -> RegistryResult<u32> {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assets WHERE parent_id = ?")
                .bind(parent_id)
                .fetch_one(&self.pool)
                .await?;
            Ok(count as u32)
        }

        #[instrument(skip(self))]
        async fn delete_asset(&self, asset_id: Uuid) -> RegistryResult<Option<AssetRow>> {
            let mut tx = self.pool.begin().await?;

            let Some(deleted) =
                sqlx::query_as::<_, AssetRow>("SELECT * FROM assets WHERE asset_id = ?")
                    .bind(asset_id)
                    .fetch_optional(&mut *tx)
                    .await?
            else {
                return Ok(None);
            };

            sqlx::query("DELETE FROM assets WHERE asset_id = ?")
                .bind(asset_id)
                .execute(&mut *tx)
                .await?;

            // Stable renumbering: survivors keep their relative order.
            let remaining: Vec<(Uuid,)> = sqlx::query_as(
                "SELECT asset_id FROM assets WHERE parent_id = ? ORDER BY position",
            )
            .bind(deleted.parent_id)
            .fetch_all(&mut *tx)
            .await?;
            let remaining: Vec<Uuid> = remaining.into_iter().map(|(id,)| id).collect();

            let plan = ordering::renumber_after_removal(&remaining);
            park_positions(&mut tx, deleted.parent_id, &plan.positions).await?;
            unpark_positions(&mut tx, deleted.parent_id).await?;

            sync_primary(&mut tx, deleted.parent_id, OffsetDateTime::now_utc()).await?;

            tx.commit().await?;
            Ok(Some(deleted))
        }

        #[instrument(skip(self, plan), fields(assets = plan.positions.len()))]
        async fn apply_order(&self, parent_id: Uuid, plan: &OrderPlan) -> RegistryResult<()> {
            let mut tx = self.pool.begin().await?;

            // The plan must cover the parent's assets exactly; a stale or
            // foreign id aborts the whole batch, leaving the previous
            // ordering fully intact.
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assets WHERE parent_id = ?")
                .bind(parent_id)
                .fetch_one(&mut *tx)
                .await?;
            if count as usize != plan.positions.len() {
                return Err(RegistryError::Constraint(format!(
                    "order plan covers {} assets but parent {parent_id} has {count}",
                    plan.positions.len()
                )));
            }

            park_positions(&mut tx, parent_id, &plan.positions).await?;
            unpark_positions(&mut tx, parent_id).await?;

            sync_primary(&mut tx, parent_id, OffsetDateTime::now_utc()).await?;

            tx.commit().await?;
            Ok(())
        }

        async fn update_alt_text(
            &self,
            asset_id: Uuid,
            alt_text: Option<&str>,
        ) -> RegistryResult<AssetRow> {
            let result = sqlx::query("UPDATE assets SET alt_text = ? WHERE asset_id = ?")
                .bind(alt_text)
                .bind(asset_id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(RegistryError::NotFound(format!(
                    "asset {asset_id} not found"
                )));
            }

            self.get_asset(asset_id)
                .await?
                .ok_or_else(|| RegistryError::NotFound(format!("asset {asset_id} not found")))
        }

        async fn count_object_key_references(&self, object_key: &str) -> RegistryResult<u64> {
            let count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM assets WHERE object_key = ?")
                    .bind(object_key)
                    .fetch_one(&self.pool)
                    .await?;
            Ok(count as u64)
        }

        async fn referenced_object_keys(&self) -> RegistryResult<HashSet<String>> {
            let rows: Vec<(String,)> = sqlx::query_as("SELECT DISTINCT object_key FROM assets")
                .fetch_all(&self.pool)
                .await?;
            Ok(rows.into_iter().map(|(key,)| key).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetRow, ParentRow};
    use crate::ordering;
    use time::OffsetDateTime;
    use uuid::Uuid;

    async fn store() -> (tempfile::TempDir, SqliteStore) {
        let temp = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(temp.path().join("registry.db"))
            .await
            .unwrap();
        (temp, store)
    }

    async fn create_parent(store: &SqliteStore) -> Uuid {
        let now = OffsetDateTime::now_utc();
        let parent = ParentRow {
            parent_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            plan_tier: "free".to_string(),
            primary_asset_url: None,
            created_at: now,
            updated_at: now,
        };
        store.create_parent(&parent).await.unwrap();
        parent.parent_id
    }

    fn asset(parent_id: Uuid, name: &str) -> AssetRow {
        AssetRow {
            asset_id: Uuid::new_v4(),
            parent_id,
            position: 0,
            url: format!("http://cdn.test/media/{name}"),
            object_key: format!("media/{name}"),
            alt_text: None,
            byte_size: 128,
            original_filename: format!("{name}.png"),
            content_type: "image/png".to_string(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Assert the ordering invariants for a parent: contiguous positions
    /// and a primary pointer equal to the position-0 URL (or null when
    /// empty).
    async fn assert_invariants(store: &SqliteStore, parent_id: Uuid) {
        let assets = store.list_assets(parent_id).await.unwrap();
        for (index, row) in assets.iter().enumerate() {
            assert_eq!(row.position, index as i64, "gap or duplicate position");
        }
        let parent = store.get_parent(parent_id).await.unwrap().unwrap();
        match assets.first() {
            Some(first) => assert_eq!(parent.primary_asset_url.as_deref(), Some(first.url.as_str())),
            None => assert_eq!(parent.primary_asset_url, None),
        }
    }

    #[tokio::test]
    async fn first_insert_takes_position_zero_and_primary() {
        let (_temp, store) = store().await;
        let parent_id = create_parent(&store).await;

        let a = store.insert_asset(&asset(parent_id, "a"), false).await.unwrap();
        assert_eq!(a.position, 0);
        assert_invariants(&store, parent_id).await;
    }

    #[tokio::test]
    async fn append_keeps_existing_primary() {
        let (_temp, store) = store().await;
        let parent_id = create_parent(&store).await;

        let a = store.insert_asset(&asset(parent_id, "a"), false).await.unwrap();
        let b = store.insert_asset(&asset(parent_id, "b"), false).await.unwrap();
        assert_eq!(b.position, 1);

        let parent = store.get_parent(parent_id).await.unwrap().unwrap();
        assert_eq!(parent.primary_asset_url.as_deref(), Some(a.url.as_str()));
        assert_invariants(&store, parent_id).await;
    }

    #[tokio::test]
    async fn primary_insert_shifts_everyone_up() {
        let (_temp, store) = store().await;
        let parent_id = create_parent(&store).await;

        let a = store.insert_asset(&asset(parent_id, "a"), false).await.unwrap();
        let b = store.insert_asset(&asset(parent_id, "b"), false).await.unwrap();
        let c = store.insert_asset(&asset(parent_id, "c"), true).await.unwrap();
        assert_eq!(c.position, 0);

        let assets = store.list_assets(parent_id).await.unwrap();
        let ids: Vec<Uuid> = assets.iter().map(|r| r.asset_id).collect();
        assert_eq!(ids, vec![c.asset_id, a.asset_id, b.asset_id]);
        assert_invariants(&store, parent_id).await;
    }

    #[tokio::test]
    async fn delete_renumbers_and_promotes() {
        let (_temp, store) = store().await;
        let parent_id = create_parent(&store).await;

        let a = store.insert_asset(&asset(parent_id, "a"), false).await.unwrap();
        let b = store.insert_asset(&asset(parent_id, "b"), false).await.unwrap();
        let c = store.insert_asset(&asset(parent_id, "c"), false).await.unwrap();

        let deleted = store.delete_asset(a.asset_id).await.unwrap().unwrap();
        assert_eq!(deleted.asset_id, a.asset_id);

        let assets = store.list_assets(parent_id).await.unwrap();
        let ids: Vec<Uuid> = assets.iter().map(|r| r.asset_id).collect();
        assert_eq!(ids, vec![b.asset_id, c.asset_id]);

        let parent = store.get_parent(parent_id).await.unwrap().unwrap();
        assert_eq!(parent.primary_asset_url.as_deref(), Some(b.url.as_str()));
        assert_invariants(&store, parent_id).await;
    }

    #[tokio::test]
    async fn deleting_last_asset_clears_primary() {
        let (_temp, store) = store().await;
        let parent_id = create_parent(&store).await;

        let a = store.insert_asset(&asset(parent_id, "a"), false).await.unwrap();
        store.delete_asset(a.asset_id).await.unwrap();

        let parent = store.get_parent(parent_id).await.unwrap().unwrap();
        assert_eq!(parent.primary_asset_url, None);
        assert_invariants(&store, parent_id).await;
    }

    #[tokio::test]
    async fn delete_missing_asset_returns_none() {
        let (_temp, store) = store().await;
        assert!(store.delete_asset(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn apply_order_reorders_atomically() {
        let (_temp, store) = store().await;
        let parent_id = create_parent(&store).await;

        let a = store.insert_asset(&asset(parent_id, "a"), false).await.unwrap();
        let b = store.insert_asset(&asset(parent_id, "b"), false).await.unwrap();

        let current = vec![a.asset_id, b.asset_id];
        let plan = ordering::reorder_plan(&current, &[b.asset_id, a.asset_id]).unwrap();
        store.apply_order(parent_id, &plan).await.unwrap();

        let assets = store.list_assets(parent_id).await.unwrap();
        let ids: Vec<Uuid> = assets.iter().map(|r| r.asset_id).collect();
        assert_eq!(ids, vec![b.asset_id, a.asset_id]);

        let parent = store.get_parent(parent_id).await.unwrap().unwrap();
        assert_eq!(parent.primary_asset_url.as_deref(), Some(b.url.as_str()));
        assert_invariants(&store, parent_id).await;
    }

    #[tokio::test]
    async fn apply_order_rolls_back_on_mid_batch_fault() {
        let (_temp, store) = store().await;
        let parent_id = create_parent(&store).await;

        let a = store.insert_asset(&asset(parent_id, "a"), false).await.unwrap();
        let b = store.insert_asset(&asset(parent_id, "b"), false).await.unwrap();
        let before = store.list_assets(parent_id).await.unwrap();

        // A plan whose second entry targets an unknown id fails after the
        // first row has already been parked; the rollback must restore the
        // pre-reorder state exactly.
        let plan = ordering::OrderPlan {
            positions: vec![(b.asset_id, 0), (Uuid::new_v4(), 1)],
        };
        let err = store.apply_order(parent_id, &plan).await.unwrap_err();
        assert!(matches!(err, RegistryError::Constraint(_)));

        let after = store.list_assets(parent_id).await.unwrap();
        assert_eq!(
            before
                .iter()
                .map(|r| (r.asset_id, r.position))
                .collect::<Vec<_>>(),
            after
                .iter()
                .map(|r| (r.asset_id, r.position))
                .collect::<Vec<_>>()
        );
        let parent = store.get_parent(parent_id).await.unwrap().unwrap();
        assert_eq!(parent.primary_asset_url.as_deref(), Some(a.url.as_str()));
    }

    #[tokio::test]
    async fn apply_order_rejects_wrong_cardinality() {
        let (_temp, store) = store().await;
        let parent_id = create_parent(&store).await;
        let a = store.insert_asset(&asset(parent_id, "a"), false).await.unwrap();
        store.insert_asset(&asset(parent_id, "b"), false).await.unwrap();

        let plan = ordering::OrderPlan {
            positions: vec![(a.asset_id, 0)],
        };
        let err = store.apply_order(parent_id, &plan).await.unwrap_err();
        assert!(matches!(err, RegistryError::Constraint(_)));
    }

    #[tokio::test]
    async fn parent_cascade_destroys_assets() {
        let (_temp, store) = store().await;
        let parent_id = create_parent(&store).await;
        let a = store.insert_asset(&asset(parent_id, "a"), false).await.unwrap();

        store.delete_parent(parent_id).await.unwrap();
        assert!(store.get_asset(a.asset_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn alt_text_update_round_trips() {
        let (_temp, store) = store().await;
        let parent_id = create_parent(&store).await;
        let a = store.insert_asset(&asset(parent_id, "a"), false).await.unwrap();

        let updated = store
            .update_alt_text(a.asset_id, Some("sunset over the harbor"))
            .await
            .unwrap();
        assert_eq!(updated.alt_text.as_deref(), Some("sunset over the harbor"));

        let err = store
            .update_alt_text(Uuid::new_v4(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[tokio::test]
    async fn object_key_reference_counts() {
        let (_temp, store) = store().await;
        let parent_id = create_parent(&store).await;

        let mut first = asset(parent_id, "a");
        first.object_key = "media/shared".to_string();
        let mut second = asset(parent_id, "b");
        second.object_key = "media/shared".to_string();
        store.insert_asset(&first, false).await.unwrap();
        store.insert_asset(&second, false).await.unwrap();

        assert_eq!(
            store.count_object_key_references("media/shared").await.unwrap(),
            2
        );
        assert_eq!(
            store.count_object_key_references("media/other").await.unwrap(),
            0
        );
        let keys = store.referenced_object_keys().await.unwrap();
        assert!(keys.contains("media/shared"));
        assert_eq!(keys.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_parent_rejected() {
        let (_temp, store) = store().await;
        let now = OffsetDateTime::now_utc();
        let parent = ParentRow {
            parent_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            plan_tier: "pro".to_string(),
            primary_asset_url: None,
            created_at: now,
            updated_at: now,
        };
        store.create_parent(&parent).await.unwrap();
        let err = store.create_parent(&parent).await.unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyExists(_)));
    }
}
