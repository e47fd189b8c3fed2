//! Health check endpoint.

use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: &'static str,
    pub registry: &'static str,
}

/// GET /v1/health
///
/// Intentionally unauthenticated for load balancers and k8s probes.
/// Checks both backing stores; any failure reports 503.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let storage_ok = match state.storage.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "storage health check failed");
            false
        }
    };
    let registry_ok = match state.registry.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "registry health check failed");
            false
        }
    };

    let healthy = storage_ok && registry_ok;
    let response = HealthResponse {
        status: if healthy { "ok" } else { "unhealthy" },
        storage: if storage_ok { "ok" } else { "failed" },
        registry: if registry_ok { "ok" } else { "failed" },
    };
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}
