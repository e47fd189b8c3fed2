//! Configuration types shared across crates.

use crate::quota::QuotaTable;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Base URL under which stored media is publicly reachable.
    /// Asset URLs are derived as `<base>/<object_key>`.
    #[serde(default = "default_media_base_url")]
    pub media_base_url: String,
    /// Application-level timeout for a single object-store call, in seconds.
    #[serde(default = "default_storage_timeout_secs")]
    pub storage_timeout_secs: u64,
    /// Bounded retry count for object-store writes. Writes are idempotent
    /// by key (content-addressed), so retrying is safe.
    #[serde(default = "default_put_retry_attempts")]
    pub put_retry_attempts: u32,
    /// Enable the /metrics endpoint for Prometheus scraping (default: true).
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_media_base_url() -> String {
    "http://127.0.0.1:8080/media".to_string()
}

fn default_storage_timeout_secs() -> u64 {
    30
}

fn default_put_retry_attempts() -> u32 {
    3
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            media_base_url: default_media_base_url(),
            storage_timeout_secs: default_storage_timeout_secs(),
            put_retry_attempts: default_put_retry_attempts(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

impl ServerConfig {
    /// Get the storage call timeout as a Duration.
    pub fn storage_timeout(&self) -> Duration {
        Duration::from_secs(self.storage_timeout_secs)
    }

    /// Build the public URL for a stored object key.
    pub fn media_url(&self, object_key: &str) -> String {
        format!("{}/{}", self.media_base_url.trim_end_matches('/'), object_key)
    }
}

/// Storage backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Local filesystem storage.
    Filesystem {
        /// Root directory for storage.
        path: PathBuf,
    },
    /// S3-compatible storage.
    S3 {
        /// Bucket name.
        bucket: String,
        /// Optional endpoint URL (for MinIO, etc.).
        endpoint: Option<String>,
        /// AWS region.
        region: Option<String>,
        /// Key prefix inside the bucket.
        prefix: Option<String>,
        /// Static access key id. Both credentials must be set together;
        /// when absent the default AWS credential chain is used.
        access_key_id: Option<String>,
        /// Static secret access key.
        secret_access_key: Option<String>,
        /// Use path-style addressing (required by MinIO).
        force_path_style: bool,
    },
}

impl StorageConfig {
    /// Validate the configuration, returning an error message on failure.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Filesystem { path } => {
                if path.as_os_str().is_empty() {
                    return Err("filesystem storage path must not be empty".to_string());
                }
                Ok(())
            }
            Self::S3 {
                bucket,
                access_key_id,
                secret_access_key,
                ..
            } => {
                if bucket.is_empty() {
                    return Err("s3 bucket must not be empty".to_string());
                }
                if access_key_id.is_some() != secret_access_key.is_some() {
                    return Err(
                        "s3 credentials must set both access_key_id and secret_access_key"
                            .to_string(),
                    );
                }
                Ok(())
            }
        }
    }
}

/// Asset registry (relational store) configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_registry_path")]
    pub path: PathBuf,
}

fn default_registry_path() -> PathBuf {
    PathBuf::from("data/registry.db")
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: default_registry_path(),
        }
    }
}

/// Orphaned-blob garbage collection configuration.
///
/// Compensating deletes are best-effort; the sweep reconciles blobs that
/// escaped them by listing media keys and removing those the registry does
/// not reference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GcConfig {
    /// Enable the periodic sweep (default: false).
    #[serde(default)]
    pub enabled: bool,
    /// Sweep interval in seconds.
    #[serde(default = "default_gc_interval_secs")]
    pub interval_secs: u64,
    /// Minimum blob age before it is eligible for collection, in seconds.
    /// Protects blobs written by in-flight inserts that have not yet been
    /// registered.
    #[serde(default = "default_gc_grace_secs")]
    pub grace_secs: u64,
}

fn default_gc_interval_secs() -> u64 {
    3600
}

fn default_gc_grace_secs() -> u64 {
    900
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: default_gc_interval_secs(),
            grace_secs: default_gc_grace_secs(),
        }
    }
}

impl GcConfig {
    /// Validate the configuration, returning an error message on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.interval_secs == 0 {
            return Err("gc.interval_secs must be at least 1 when gc is enabled".to_string());
        }
        Ok(())
    }
}

/// Top-level application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub quotas: QuotaTable,
    #[serde(default)]
    pub gc: GcConfig,
}

impl AppConfig {
    /// Create a test configuration rooted at a temporary directory.
    ///
    /// **For testing only.**
    pub fn for_testing(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::Filesystem {
                path: root.join("store"),
            },
            registry: RegistryConfig {
                path: root.join("registry.db"),
            },
            quotas: QuotaTable::default(),
            gc: GcConfig::default(),
        }
    }
}
