//! Error types for the calculator service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::calc::CalcError;
use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Failures at the repository's serialization boundary.
///
/// The store itself never fails; every variant here names the key involved
/// where one exists.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key absent or expired
    #[error("key is not found: {0}")]
    NotFound(String),

    /// Request could not be turned into a cache key
    #[error("failed to derive cache key: {0}")]
    KeyDerivation(#[source] serde_json::Error),

    /// Result could not be serialized for storage
    #[error("failed to encode value for key {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Stored value or key could not be deserialized
    #[error("failed to decode entry for key {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

// == API Error Enum ==
/// Errors surfaced to HTTP clients.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request data
    #[error("{0}")]
    InvalidRequest(String),

    /// Domain precondition rejected by the calculator
    #[error(transparent)]
    Calculation(#[from] CalcError),

    /// Cache listing failed
    #[error(transparent)]
    Cache(#[from] CacheError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Calculation(err @ CalcError::InsufficientInitialPayment) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Calculation(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to calculate params".to_string(),
            ),
            ApiError::Cache(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to list cache entries".to_string(),
            ),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Aliases ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Convenience Result type for HTTP handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
