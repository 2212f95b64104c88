//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use byteworld_metrics::MetricsError;
use byteworld_registry::LookupError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// A request that could not be answered with an entity.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A path parameter is malformed.
    #[error("{0}")]
    BadInput(String),

    /// The requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// No registry snapshot is being served.
    #[error("Registry has not been loaded")]
    Unavailable,

    /// Metrics could not be rendered.
    #[error("Failed to render metrics: {0}")]
    Metrics(#[from] MetricsError),
}

impl ApiError {
    /// Returns the status code the error is reported with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::BadInput { reason } => Self::BadInput(reason),
            not_found @ LookupError::NotFound { .. } => Self::NotFound(not_found.to_string()),
            LookupError::Unavailable => Self::Unavailable,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_mapping() {
        let err = ApiError::from(LookupError::NotFound {
            what: "ASN".to_string(),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "ASN not found");

        let err = ApiError::from(LookupError::BadInput {
            reason: "'x' is not an IPv4 network".to_string(),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "'x' is not an IPv4 network");

        assert_eq!(
            ApiError::from(LookupError::Unavailable).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::NotFound("Service type not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
