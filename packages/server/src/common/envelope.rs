//! Uniform response envelope.
//!
//! Every endpoint answers with `{ data, success, message }`. Handlers build
//! the success variant; failures are represented internally as [`ApiError`]
//! and serialized into the same shape at the boundary.
//!
//! [`ApiError`]: super::error::ApiError

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub data: T,
    pub success: bool,
    pub message: String,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            success: true,
            message: message.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
