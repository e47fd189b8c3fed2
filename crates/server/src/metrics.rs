//! Prometheus metrics for the Folio server.
//!
//! # Security Note
//!
//! The `/metrics` endpoint is unauthenticated to allow Prometheus scraping.
//! Metrics contain no tenant data (no parent IDs, URLs, or hashes), only
//! aggregate counters. The endpoint should still be network-restricted to
//! authorized scraper IPs at the infrastructure level.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{self, Encoder, IntCounter, Registry, TextEncoder};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// Pipeline metrics
pub static ASSETS_INSERTED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "folio_assets_inserted_total",
        "Total number of assets successfully inserted",
    )
    .expect("metric creation failed")
});

pub static ASSETS_DELETED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "folio_assets_deleted_total",
        "Total number of assets deleted",
    )
    .expect("metric creation failed")
});

pub static REORDERS_APPLIED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "folio_reorders_applied_total",
        "Total number of reorder batches applied",
    )
    .expect("metric creation failed")
});

pub static QUOTA_REJECTIONS: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "folio_quota_rejections_total",
        "Total number of inserts rejected by per-tier quotas",
    )
    .expect("metric creation failed")
});

// Cross-store consistency metrics
pub static COMPENSATING_DELETES: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "folio_compensating_deletes_total",
        "Total number of compensating blob deletes after a failed registration",
    )
    .expect("metric creation failed")
});

pub static BLOB_DELETE_FAILURES: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "folio_blob_delete_failures_total",
        "Total number of blob deletes that failed and left an orphan for the sweep",
    )
    .expect("metric creation failed")
});

pub static ORPHANED_BLOBS_COLLECTED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "folio_orphaned_blobs_collected_total",
        "Total number of unreferenced blobs removed by the orphan sweep",
    )
    .expect("metric creation failed")
});

/// Guard to ensure metrics are only registered once.
static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry.
///
/// This function is idempotent - subsequent calls after the first are no-ops.
/// This allows safe use in integration tests or when embedding multiple routers.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        REGISTRY
            .register(Box::new(ASSETS_INSERTED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(ASSETS_DELETED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(REORDERS_APPLIED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(QUOTA_REJECTIONS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(COMPENSATING_DELETES.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(BLOB_DELETE_FAILURES.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(ORPHANED_BLOBS_COLLECTED.clone()))
            .expect("metric registration failed");
    });
}

/// GET /metrics - Prometheus metrics endpoint.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}
