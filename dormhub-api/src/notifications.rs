use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use dormhub_core::identity::Actor;
use dormhub_core::notify::Notification;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/notifications", get(list_notifications))
        .route("/v1/notifications/{id}/read", post(mark_read))
}

/// GET /v1/notifications
async fn list_notifications(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notes = state
        .notifications
        .list_for_user(actor.id)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    Ok(Json(notes))
}

/// POST /v1/notifications/:id/read
async fn mark_read(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let updated = state
        .notifications
        .mark_read(id, actor.id)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    if !updated {
        return Err(AppError::NotFound(format!("notification {}", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
