use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::resolver::ResolutionFailure;
use crate::storage::{ConfigurationError, SigningError};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("File key is required")]
    InvalidRequest,
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("File not found. Tried keys: {}", .0.attempted_keys.join(", "))]
    NotFound(ResolutionFailure),
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ResolveError {
    pub fn status(&self) -> StatusCode {
        match self {
            ResolveError::InvalidRequest => StatusCode::BAD_REQUEST,
            ResolveError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ResolveError::NotFound(_) => StatusCode::NOT_FOUND,
            ResolveError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ResolveError::NotFound(failure) => json!({
                "error": self.to_string(),
                "triedKeys": failure.attempted_keys,
            }),
            ResolveError::Configuration(err) => {
                tracing::error!(?err, "storage configuration incomplete");
                json!({ "error": self.to_string() })
            }
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

/// Failures of the single-key `/api/kyc-url` route.
#[derive(Debug, Error)]
pub enum KycUrlError {
    #[error("Missing 'key' query parameter")]
    MissingKey,
    #[error("Missing AWS S3 configuration. Please check your environment variables.")]
    Configuration(#[from] ConfigurationError),
    #[error("{0}")]
    Signing(#[from] SigningError),
}

impl IntoResponse for KycUrlError {
    fn into_response(self) -> Response {
        let status = match self {
            KycUrlError::MissingKey => StatusCode::BAD_REQUEST,
            KycUrlError::Configuration(_) | KycUrlError::Signing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!(?self, "error generating signed URL");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_lists_keys() {
        let err = ResolveError::NotFound(ResolutionFailure {
            attempted_keys: vec!["a.jpg".into(), "kyc/a.jpg".into()],
            last_error: None,
        });
        assert_eq!(err.to_string(), "File not found. Tried keys: a.jpg, kyc/a.jpg");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn configuration_errors_keep_their_message() {
        let err = ResolveError::from(ConfigurationError::MissingBucket);
        assert_eq!(err.to_string(), "S3 bucket configuration is missing");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
