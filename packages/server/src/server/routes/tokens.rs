use axum::extract::State;
use axum::Json;
use serde_json::Value;

use super::body_object;
use crate::common::envelope::Envelope;
use crate::common::error::ApiError;
use crate::server::app::AppState;

/// Issue a bearer token for the posted claims. Public: this is the login
/// path, and the token only becomes useful once the identity it names holds
/// privileges in the store.
pub async fn issue(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Envelope<Value>, ApiError> {
    let claims = body_object(body)?;
    let token = state.tokens.issue(&claims)?;
    Ok(Envelope::ok(Value::String(token), "token issued"))
}
