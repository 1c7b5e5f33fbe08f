// HTTP routes
pub mod blogs;
pub mod catalog;
pub mod health;
pub mod newsletter;
pub mod orders;
pub mod reports;
pub mod tokens;
pub mod users;
pub mod wishlist;

use serde_json::Value;

use crate::common::error::ApiError;
use crate::kernel::store::Fields;

/// Mutating endpoints accept a JSON object body; anything else is a client
/// error, surfaced before any store access.
pub(crate) fn body_object(body: Value) -> Result<Fields, ApiError> {
    body.as_object()
        .cloned()
        .ok_or_else(|| ApiError::BadRequest("request body must be a JSON object".to_string()))
}

/// Same as [`body_object`] but for endpoints where the body is optional.
pub(crate) fn optional_body_object(body: Option<Value>) -> Result<Fields, ApiError> {
    match body {
        Some(value) => body_object(value),
        None => Ok(Fields::new()),
    }
}
