//! Fault-injecting wrappers around the real backends.

use async_trait::async_trait;
use bytes::Bytes;
use folio_registry::models::{AssetRow, ParentRow};
use folio_registry::ordering::OrderPlan;
use folio_registry::store::RegistryStore;
use folio_registry::{AssetRepo, ParentRepo, RegistryError, RegistryResult};
use folio_storage::{ObjectMeta, ObjectStore, StorageError, StorageResult};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use uuid::Uuid;

/// Storage wrapper that can fail puts or deletes on demand and counts calls.
#[allow(dead_code)]
pub struct FlakyStorage {
    inner: Arc<dyn ObjectStore>,
    pub fail_puts: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub put_calls: AtomicU32,
    pub delete_calls: AtomicU32,
}

#[allow(dead_code)]
impl FlakyStorage {
    pub fn new(inner: Arc<dyn ObjectStore>) -> Self {
        Self {
            inner,
            fail_puts: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            put_calls: AtomicU32::new(0),
            delete_calls: AtomicU32::new(0),
        }
    }

    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn put_count(&self) -> u32 {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> u32 {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for FlakyStorage {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.inner.exists(key).await
    }

    async fn head(&self, key: &str) -> StorageResult<ObjectMeta> {
        self.inner.head(key).await
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("injected put failure")));
        }
        self.inner.put(key, data).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other(
                "injected delete failure",
            )));
        }
        self.inner.delete(key).await
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        self.inner.list(prefix).await
    }

    fn backend_name(&self) -> &'static str {
        "flaky"
    }
}

/// Registry wrapper that can fail asset registration on demand.
#[allow(dead_code)]
pub struct FlakyRegistry {
    inner: Arc<dyn RegistryStore>,
    pub fail_inserts: AtomicBool,
}

#[allow(dead_code)]
impl FlakyRegistry {
    pub fn new(inner: Arc<dyn RegistryStore>) -> Self {
        Self {
            inner,
            fail_inserts: AtomicBool::new(false),
        }
    }

    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ParentRepo for FlakyRegistry {
    async fn create_parent(&self, parent: &ParentRow) -> RegistryResult<()> {
        self.inner.create_parent(parent).await
    }

    async fn get_parent(&self, parent_id: Uuid) -> RegistryResult<Option<ParentRow>> {
        self.inner.get_parent(parent_id).await
    }

    async fn delete_parent(&self, parent_id: Uuid) -> RegistryResult<()> {
        self.inner.delete_parent(parent_id).await
    }
}

#[async_trait]
impl AssetRepo for FlakyRegistry {
    async fn insert_asset(&self, asset: &AssetRow, as_primary: bool) -> RegistryResult<AssetRow> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(RegistryError::Internal("injected insert failure".into()));
        }
        self.inner.insert_asset(asset, as_primary).await
    }

    async fn get_asset(&self, asset_id: Uuid) -> RegistryResult<Option<AssetRow>> {
        self.inner.get_asset(asset_id).await
    }

    async fn list_assets(&self, parent_id: Uuid) -> RegistryResult<Vec<AssetRow>> {
        self.inner.list_assets(parent_id).await
    }

    async fn count_assets(&self, parent_id: Uuid) -> RegistryResult<u32> {
        self.inner.count_assets(parent_id).await
    }

    async fn delete_asset(&self, asset_id: Uuid) -> RegistryResult<Option<AssetRow>> {
        self.inner.delete_asset(asset_id).await
    }

    async fn apply_order(&self, parent_id: Uuid, plan: &OrderPlan) -> RegistryResult<()> {
        self.inner.apply_order(parent_id, plan).await
    }

    async fn update_alt_text(
        &self,
        asset_id: Uuid,
        alt_text: Option<&str>,
    ) -> RegistryResult<AssetRow> {
        self.inner.update_alt_text(asset_id, alt_text).await
    }

    async fn count_object_key_references(&self, object_key: &str) -> RegistryResult<u64> {
        self.inner.count_object_key_references(object_key).await
    }

    async fn referenced_object_keys(&self) -> RegistryResult<HashSet<String>> {
        self.inner.referenced_object_keys().await
    }
}

#[async_trait]
impl RegistryStore for FlakyRegistry {
    async fn migrate(&self) -> RegistryResult<()> {
        self.inner.migrate().await
    }

    async fn health_check(&self) -> RegistryResult<()> {
        self.inner.health_check().await
    }
}
