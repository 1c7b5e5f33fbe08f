use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use super::body_object;
use crate::common::entity_ids::User;
use crate::common::envelope::Envelope;
use crate::common::error::ApiError;
use crate::domains::auth::ElevationMode;
use crate::domains::users;
use crate::kernel::store::Document;
use crate::server::app::AppState;

/// Create or update the identity for `email` and hand back a fresh token.
/// Role and verification status in the body are ignored; those fields only
/// change through the elevation routes.
pub async fn register(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(body): Json<Value>,
) -> Result<Envelope<Value>, ApiError> {
    let profile = body_object(body)?;
    let user = users::register(&state.db_pool, &email, profile).await?;
    let token = state.tokens.issue(&user.fields)?;

    Ok(Envelope::ok(
        json!({"user": user, "token": token}),
        "user saved",
    ))
}

/// Current stored role for an email, `null` when unset or unknown.
pub async fn role_lookup(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Envelope<Value>, ApiError> {
    let role = users::role_of(&state.db_pool, &email).await?;
    Ok(Envelope::ok(
        json!({"role": role.map(|r| r.as_str())}),
        "role resolved",
    ))
}

pub async fn list(State(state): State<AppState>) -> Result<Envelope<Vec<Document<User>>>, ApiError> {
    let all = users::list(&state.db_pool).await?;
    Ok(Envelope::ok(all, "users listed"))
}

pub async fn list_by_role(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> Result<Envelope<Vec<Document<User>>>, ApiError> {
    let matching = users::list_by_role(&state.db_pool, &role).await?;
    Ok(Envelope::ok(matching, format!("users with role {role}")))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Envelope<Value>, ApiError> {
    let removed = users::remove_by_email(&state.db_pool, &email).await?;
    if !removed {
        return Err(ApiError::ReferenceNotFound(format!(
            "no user with email {email}"
        )));
    }
    Ok(Envelope::ok(Value::Null, "user deleted"))
}

pub async fn promote_admin(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Envelope<Document<User>>, ApiError> {
    let user = state
        .elevation
        .promote_to_admin(&email, ElevationMode::Upsert)
        .await?;
    Ok(Envelope::ok(user, "user promoted to admin"))
}

pub async fn verify_seller(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Envelope<Document<User>>, ApiError> {
    let user = state
        .elevation
        .verify_seller(&email, ElevationMode::Upsert)
        .await?;
    Ok(Envelope::ok(user, "seller verified"))
}
