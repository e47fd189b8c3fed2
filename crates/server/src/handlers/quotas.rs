//! Read-only quota table endpoint.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use folio_core::QuotaTable;

/// GET /v1/quotas
///
/// Exposes the static per-tier limits for the billing/upgrade UI.
pub async fn get_quotas(State(state): State<AppState>) -> ApiResult<Json<QuotaTable>> {
    Ok(Json(state.config.quotas.clone()))
}
