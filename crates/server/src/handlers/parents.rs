//! Parent record endpoints.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use folio_core::PlanTier;
use folio_registry::models::ParentRow;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Create parent request.
#[derive(Debug, Deserialize)]
pub struct CreateParentRequest {
    /// Owning account.
    pub owner_id: Uuid,
    /// Billing tier; determines the quota policy.
    pub plan_tier: PlanTier,
}

/// Parent response.
#[derive(Debug, Serialize)]
pub struct ParentResponse {
    pub parent_id: Uuid,
    pub owner_id: Uuid,
    pub plan_tier: String,
    /// URL of the position-0 asset, or null when the parent has no assets.
    pub primary_asset_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: time::OffsetDateTime,
}

impl From<ParentRow> for ParentResponse {
    fn from(row: ParentRow) -> Self {
        Self {
            parent_id: row.parent_id,
            owner_id: row.owner_id,
            plan_tier: row.plan_tier,
            primary_asset_url: row.primary_asset_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// POST /v1/parents
pub async fn create_parent(
    State(state): State<AppState>,
    Json(request): Json<CreateParentRequest>,
) -> ApiResult<(StatusCode, Json<ParentResponse>)> {
    let parent = state
        .coordinator
        .create_parent(request.owner_id, request.plan_tier)
        .await?;
    Ok((StatusCode::CREATED, Json(parent.into())))
}

/// GET /v1/parents/{parent_id}
pub async fn get_parent(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
) -> ApiResult<Json<ParentResponse>> {
    let parent = state.coordinator.get_parent(parent_id).await?;
    Ok(Json(parent.into()))
}

/// DELETE /v1/parents/{parent_id}
pub async fn delete_parent(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.coordinator.delete_parent(parent_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
