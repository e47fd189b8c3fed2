//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_media::MediaError;
use folio_registry::RegistryError;
use folio_storage::StorageError;
use serde::Serialize;

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Structured context, present on quota rejections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("quota exceeded for tier '{tier}': {current} of {limit} assets used")]
    QuotaExceeded {
        tier: String,
        limit: u32,
        current: u32,
    },

    #[error("invalid reorder: {0}")]
    InvalidReorder(String),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("core error: {0}")]
    Core(#[from] folio_core::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::InvalidReorder(_) => "invalid_reorder",
            Self::Media(e) => match e {
                MediaError::UnsupportedType(_) => "unsupported_type",
                MediaError::FileTooLarge { .. } => "file_too_large",
                MediaError::Corrupt(_) => "transform_error",
                MediaError::DimensionsTooLarge { .. } => "transform_error",
            },
            Self::Storage(_) => "storage_error",
            Self::Registry(e) => match e {
                RegistryError::NotFound(_) => "not_found",
                RegistryError::AlreadyExists(_) => "conflict",
                RegistryError::Constraint(_) => "conflict",
                _ => "registry_error",
            },
            Self::Core(_) => "bad_request",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::QuotaExceeded { .. } => StatusCode::FORBIDDEN,
            Self::InvalidReorder(_) => StatusCode::CONFLICT,
            Self::Media(e) => match e {
                MediaError::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                MediaError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                MediaError::Corrupt(_) => StatusCode::UNPROCESSABLE_ENTITY,
                MediaError::DimensionsTooLarge { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            },
            Self::Storage(_) => StatusCode::BAD_GATEWAY,
            Self::Registry(e) => match e {
                RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
                RegistryError::AlreadyExists(_) => StatusCode::CONFLICT,
                RegistryError::Constraint(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Core(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::QuotaExceeded {
                tier,
                limit,
                current,
            } => Some(serde_json::json!({
                "tier": tier,
                "limit": limit,
                "current": current,
            })),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
            details: self.details(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
