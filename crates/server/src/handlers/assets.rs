//! Asset pipeline endpoints.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use bytes::Bytes;
use folio_media::RawUpload;
use folio_registry::models::AssetRow;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Asset response.
#[derive(Debug, Serialize)]
pub struct AssetResponse {
    pub asset_id: Uuid,
    pub parent_id: Uuid,
    /// Contiguous 0-based position within the parent.
    pub position: i64,
    pub url: String,
    pub alt_text: Option<String>,
    pub byte_size: i64,
    pub original_filename: String,
    pub content_type: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
}

impl From<AssetRow> for AssetResponse {
    fn from(row: AssetRow) -> Self {
        Self {
            asset_id: row.asset_id,
            parent_id: row.parent_id,
            position: row.position,
            url: row.url,
            alt_text: row.alt_text,
            byte_size: row.byte_size,
            original_filename: row.original_filename,
            content_type: row.content_type,
            created_at: row.created_at,
        }
    }
}

/// Asset list response, position ascending.
#[derive(Debug, Serialize)]
pub struct AssetListResponse {
    pub assets: Vec<AssetResponse>,
}

impl From<Vec<AssetRow>> for AssetListResponse {
    fn from(rows: Vec<AssetRow>) -> Self {
        Self {
            assets: rows.into_iter().map(AssetResponse::from).collect(),
        }
    }
}

/// Upload query parameters.
#[derive(Debug, Deserialize)]
pub struct UploadParams {
    /// Designate the new asset as primary (position 0).
    #[serde(default)]
    pub primary: bool,
    /// Alt text for the new asset.
    pub alt: Option<String>,
    /// Original client filename, kept for display.
    pub filename: Option<String>,
}

/// POST /v1/parents/{parent_id}/assets
///
/// The request body is the raw image bytes; Content-Type declares the
/// media type and must agree with the magic bytes.
pub async fn upload_asset(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<AssetResponse>)> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("missing Content-Type header".to_string()))?
        .to_string();

    let upload = RawUpload {
        bytes: body,
        content_type,
        original_filename: params.filename.unwrap_or_else(|| "upload".to_string()),
    };

    let asset = state
        .coordinator
        .insert_asset(parent_id, upload, params.primary, params.alt)
        .await?;
    Ok((StatusCode::CREATED, Json(asset.into())))
}

/// GET /v1/parents/{parent_id}/assets
pub async fn list_assets(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
) -> ApiResult<Json<AssetListResponse>> {
    let assets = state.coordinator.list_assets(parent_id).await?;
    Ok(Json(assets.into()))
}

/// Reorder request: the parent's asset ids in their new order.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub order: Vec<Uuid>,
}

/// PUT /v1/parents/{parent_id}/assets/order
///
/// The supplied ids must be exactly a permutation of the parent's current
/// assets; anything else is rejected and the stored order is untouched.
pub async fn reorder_assets(
    State(state): State<AppState>,
    Path(parent_id): Path<Uuid>,
    Json(request): Json<ReorderRequest>,
) -> ApiResult<Json<AssetListResponse>> {
    let assets = state
        .coordinator
        .reorder_assets(parent_id, &request.order)
        .await?;
    Ok(Json(assets.into()))
}

/// GET /v1/assets/{asset_id}
pub async fn get_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<Uuid>,
) -> ApiResult<Json<AssetResponse>> {
    let asset = state.coordinator.get_asset(asset_id).await?;
    Ok(Json(asset.into()))
}

/// Asset update request. A null or absent alt_text clears it.
#[derive(Debug, Deserialize)]
pub struct UpdateAssetRequest {
    pub alt_text: Option<String>,
}

/// PATCH /v1/assets/{asset_id}
pub async fn update_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<Uuid>,
    Json(request): Json<UpdateAssetRequest>,
) -> ApiResult<Json<AssetResponse>> {
    let asset = state
        .coordinator
        .update_alt_text(asset_id, request.alt_text.as_deref())
        .await?;
    Ok(Json(asset.into()))
}

/// DELETE /v1/assets/{asset_id}
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.coordinator.delete_asset(asset_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
