use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::common::error::ApiError;
use crate::domains::users::{self, Role};
use crate::server::app::AppState;
use crate::server::middleware::AuthClaims;

/// Authorization gate for admin-only routes.
///
/// Runs after [`require_auth`] and re-reads the caller's role from the
/// identity store - exactly one read, no writes. The role embedded in the
/// token is never consulted: it reflects issuance time, and privileges
/// granted or revoked since then must take effect on the very next request.
///
/// [`require_auth`]: super::jwt_auth::require_auth
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = request
        .extensions()
        .get::<AuthClaims>()
        .ok_or(ApiError::Unauthenticated)?;

    let role = users::role_of(&state.db_pool, &claims.0.email).await?;
    if role != Some(Role::Admin) {
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(request).await)
}
