use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use dormhub_core::identity::{Actor, Role};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
}

// ============================================================================
// Session Resolution Middleware
// ============================================================================

/// Decodes the bearer token once per request and injects the resolved
/// `Actor` into request extensions. Everything behind this layer reads the
/// caller from there instead of re-parsing headers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let claims = token_data.claims;
    let id = Uuid::parse_str(&claims.sub).map_err(|_| StatusCode::UNAUTHORIZED)?;
    let actor = Actor {
        id,
        role: Role::parse_lenient(&claims.role),
    };

    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}

// ============================================================================
// Role Gates
// ============================================================================

/// Gate for owner-scoped routes. Admin passes as superuser.
pub async fn require_owner(req: Request, next: Next) -> Result<Response, StatusCode> {
    let actor = req
        .extensions()
        .get::<Actor>()
        .ok_or(StatusCode::UNAUTHORIZED)?;
    if actor.role.can_access(Role::Owner) {
        Ok(next.run(req).await)
    } else {
        Err(StatusCode::FORBIDDEN)
    }
}

/// Gate for the admin back-office routes.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, StatusCode> {
    let actor = req
        .extensions()
        .get::<Actor>()
        .ok_or(StatusCode::UNAUTHORIZED)?;
    if actor.role == Role::Admin {
        Ok(next.run(req).await)
    } else {
        Err(StatusCode::FORBIDDEN)
    }
}
