use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use contracts::enums::UserRole;
use contracts::system::auth::TokenClaims;

use crate::shared::error::AppError;
use crate::shared::state::AppState;

fn bearer_claims(state: &AppState, req: &Request) -> Result<TokenClaims, AppError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    state.jwt.validate_token(token).map_err(|e| {
        tracing::debug!("rejected token: {:#}", e);
        AppError::Unauthorized
    })
}

/// Middleware that requires a valid bearer token
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = bearer_claims(&state, &req)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Middleware that requires the admin role
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = bearer_claims(&state, &req)?;
    if claims.user_role != UserRole::Admin.code() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
