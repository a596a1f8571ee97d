//! API error type and its HTTP mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::pagination::PaginationError;
use crate::store::StoreError;
use crate::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("invalid page")]
    InvalidPage,

    #[error("JSON parse error - {0}")]
    MalformedJson(String),

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<PaginationError> for ApiError {
    fn from(_: PaginationError) -> Self {
        ApiError::InvalidPage
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::UnsupportedMediaType(rejection.body_text())
            }
            other => ApiError::MalformedJson(other.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response()
            }
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::InvalidPage => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": "Invalid page." }))).into_response()
            }
            err @ ApiError::MalformedJson(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": err.to_string() })),
            )
                .into_response(),
            ApiError::UnsupportedMediaType(detail) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(json!({ "detail": detail })),
            )
                .into_response(),
            ApiError::Store(e) => {
                error!("Storage failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "A server error occurred." })),
                )
                    .into_response()
            }
        }
    }
}
