use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::common::error::ApiError;
use crate::domains::auth::{Claims, TokenService};
use crate::server::app::AppState;

/// Decoded claims of the authenticated caller, attached to request
/// extensions for downstream handlers and the admin gate.
#[derive(Clone, Debug)]
pub struct AuthClaims(pub Claims);

/// Authentication gate.
///
/// Requires a `Bearer` credential in the Authorization header and rejects
/// the request before any handler logic or store access when the header is
/// absent, malformed, or fails verification.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = extract_claims(&request, &state.tokens)?;
    debug!(email = %claims.email, "authenticated request");

    request.extensions_mut().insert(AuthClaims(claims));
    Ok(next.run(request).await)
}

/// Extract and verify the bearer token from a request.
fn extract_claims(request: &Request, tokens: &TokenService) -> Result<Claims, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(ApiError::Unauthenticated)?;
    let value = header.to_str().map_err(|_| ApiError::Unauthenticated)?;

    // Strictly `Bearer <token>`; a raw token with no scheme is malformed.
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthenticated)?;

    tokens.verify(token).map_err(|_| ApiError::Unauthenticated)
}
