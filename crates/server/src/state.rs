//! Application state shared across handlers.

use crate::coordinator::ConsistencyCoordinator;
use crate::locks::{BlobLocks, ParentLocks};
use folio_core::config::AppConfig;
use folio_media::CanonicalTransformer;
use folio_registry::store::RegistryStore;
use folio_storage::ObjectStore;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Object storage backend.
    pub storage: Arc<dyn ObjectStore>,
    /// Asset registry.
    pub registry: Arc<dyn RegistryStore>,
    /// Per-parent mutation locks.
    pub locks: ParentLocks,
    /// Per-object-key blob locks.
    pub blob_locks: BlobLocks,
    /// Mutation pipeline coordinator.
    pub coordinator: Arc<ConsistencyCoordinator>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// This validates configuration up front so a misconfigured server
    /// fails at startup rather than on the first request.
    ///
    /// # Panics
    ///
    /// Panics if storage, quota, or GC configuration is invalid.
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn ObjectStore>,
        registry: Arc<dyn RegistryStore>,
    ) -> Self {
        if let Err(error) = config.storage.validate() {
            panic!("Invalid storage configuration: {}", error);
        }
        if let Err(error) = config.quotas.validate() {
            panic!("Invalid quota configuration: {}", error);
        }
        if let Err(error) = config.gc.validate() {
            panic!("Invalid GC configuration: {}", error);
        }

        let config = Arc::new(config);
        let locks = ParentLocks::new();
        let blob_locks = BlobLocks::new();
        let coordinator = Arc::new(ConsistencyCoordinator::new(
            config.clone(),
            storage.clone(),
            registry.clone(),
            Arc::new(CanonicalTransformer::default()),
            locks.clone(),
            blob_locks.clone(),
        ));

        Self {
            config,
            storage,
            registry,
            locks,
            blob_locks,
            coordinator,
        }
    }
}
