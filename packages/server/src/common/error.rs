//! Error taxonomy for the request path.
//!
//! Authentication and authorization failures carry their own status codes so
//! clients can tell "not logged in" from "not permitted"; everything else is
//! surfaced as a failed envelope with the cause in the message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use thiserror::Error;

use super::envelope::Envelope;
use crate::kernel::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed, or expired credential.
    #[error("unauthorized")]
    Unauthenticated,

    /// Valid credential, insufficient role.
    #[error("forbidden access")]
    Forbidden,

    /// Malformed identifier supplied to a reference-taking operation.
    #[error("{0}")]
    InvalidReference(String),

    /// Well-formed identifier with no matching record.
    #[error("{0}")]
    ReferenceNotFound(String),

    /// Malformed request input (non-object body, missing required field).
    #[error("{0}")]
    BadRequest(String),

    /// Underlying persistence operation failed.
    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<crate::domains::auth::TokenError> for ApiError {
    fn from(err: crate::domains::auth::TokenError) -> Self {
        use crate::domains::auth::TokenError;
        match err {
            TokenError::MissingEmail => Self::BadRequest(err.to_string()),
            TokenError::Invalid => Self::Unauthenticated,
            TokenError::Encode(source) => Self::Internal(source.into()),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidReference(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ReferenceNotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Store(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "request failed");
        }

        let body = Envelope {
            data: Value::Null,
            success: false,
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Unauthenticated.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::InvalidReference("bad id".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::ReferenceNotFound("no such product".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_failure_envelope_shape() {
        let response = ApiError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], Value::Bool(false));
        assert_eq!(body["data"], Value::Null);
        assert_eq!(body["message"], "forbidden access");
    }
}
