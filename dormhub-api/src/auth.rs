use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::{
    extract::State,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{Duration, Utc};
use dormhub_core::identity::{Actor, Profile, Role};
use dormhub_core::FieldError;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SignupRequest {
    email: String,
    password: String,
    full_name: String,
    #[serde(default)]
    phone_number: String,
    role: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    token: String,
    profile: Profile,
    dashboard: &'static str,
}

#[derive(Debug, Deserialize)]
struct UpdateProfileRequest {
    full_name: String,
    #[serde(default)]
    phone_number: String,
}

// ============================================================================
// Routes & Handlers
// ============================================================================

/// Public sign-in surface.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/signup", post(signup))
        .route("/v1/auth/login", post(login))
}

/// Session-scoped profile surface, behind the auth layer.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/me", get(me))
        .route("/v1/profile", put(update_profile))
}

/// POST /v1/auth/signup
async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let mut fields = Vec::new();
    if !req.email.contains('@') {
        fields.push(FieldError { field: "email", message: "a valid email is required" });
    }
    if req.password.len() < 8 {
        fields.push(FieldError {
            field: "password",
            message: "password must be at least 8 characters",
        });
    }
    if req.full_name.trim().is_empty() {
        fields.push(FieldError { field: "full_name", message: "full name is required" });
    }
    // Strict role validation at the signup boundary. Admin accounts are
    // provisioned by operators, never self-service.
    let role = match req.role.parse::<Role>() {
        Ok(Role::Admin) | Err(_) => {
            fields.push(FieldError {
                field: "role",
                message: "role must be STUDENT or OWNER",
            });
            Role::Student
        }
        Ok(role) => role,
    };
    if !fields.is_empty() {
        return Err(AppError::Validation(fields));
    }

    if state
        .profiles
        .find_by_email(&req.email)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .is_some()
    {
        return Err(AppError::Conflict("email is already registered".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {}", e)))?
        .to_string();

    let now = Utc::now();
    let profile = Profile {
        id: Uuid::new_v4(),
        email: req.email,
        full_name: req.full_name,
        phone_number: req.phone_number,
        role,
        created_at: now,
        updated_at: now,
    };
    state
        .profiles
        .create(&profile, &password_hash)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    tracing::info!(user_id = %profile.id, role = %profile.role, "account created");

    let token = issue_token(&state, &profile)?;
    Ok(Json(SessionResponse {
        token,
        dashboard: profile.role.dashboard_path(),
        profile,
    }))
}

/// POST /v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let record = state
        .profiles
        .find_by_email(&req.email)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .ok_or_else(|| AppError::Authentication("invalid email or password".to_string()))?;

    let parsed = PasswordHash::new(&record.password_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored hash unreadable: {}", e)))?;
    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed)
        .map_err(|_| AppError::Authentication("invalid email or password".to_string()))?;

    let token = issue_token(&state, &record.profile)?;
    Ok(Json(SessionResponse {
        token,
        dashboard: record.profile.role.dashboard_path(),
        profile: record.profile,
    }))
}

/// GET /v1/me
async fn me(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<SessionResponse>, AppError> {
    let profile = state
        .profiles
        .get(actor.id)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .ok_or_else(|| AppError::NotFound(format!("profile {}", actor.id)))?;

    let token = issue_token(&state, &profile)?;
    Ok(Json(SessionResponse {
        token,
        dashboard: profile.role.dashboard_path(),
        profile,
    }))
}

/// PUT /v1/profile
async fn update_profile(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    if req.full_name.trim().is_empty() {
        return Err(AppError::Validation(vec![FieldError {
            field: "full_name",
            message: "full name is required",
        }]));
    }

    let updated = state
        .profiles
        .update_contact(actor.id, &req.full_name, &req.phone_number)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    if !updated {
        return Err(AppError::NotFound(format!("profile {}", actor.id)));
    }

    let profile = state
        .profiles
        .get(actor.id)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .ok_or_else(|| AppError::NotFound(format!("profile {}", actor.id)))?;
    Ok(Json(profile))
}

fn issue_token(state: &AppState, profile: &Profile) -> Result<String, AppError> {
    let claims = Claims {
        sub: profile.id.to_string(),
        email: profile.email.clone(),
        role: profile.role.to_string(),
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("token encoding failed: {}", e)))
}
