use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use dormhub_booking::model::{Booking, BookingStatus, BookingView};
use dormhub_core::identity::Actor;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct CreateBookingRequest {
    hostel_id: Uuid,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DecideBookingRequest {
    status: BookingStatus,
}

// ============================================================================
// Routes & Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(request_booking))
        .route("/v1/bookings/mine", get(my_bookings))
        .route(
            "/v1/bookings/{id}",
            axum::routing::delete(cancel_booking),
        )
        .route("/v1/bookings/{id}/status", post(decide_booking))
}

/// POST /v1/bookings
/// Create a pending request against a hostel. Students only.
async fn request_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .bookings
        .create(&actor, req.hostel_id, req.message)
        .await?;
    Ok(Json(booking))
}

/// GET /v1/bookings/mine
/// The caller's own requests, joined with hostel display data.
async fn my_bookings(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    Ok(Json(state.bookings.list_for_student(&actor).await?))
}

/// POST /v1/bookings/:id/status
/// Approve or reject a pending request. Listing owner or admin only.
async fn decide_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<DecideBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.bookings.set_status(&actor, id, req.status).await?;
    Ok(Json(booking))
}

/// DELETE /v1/bookings/:id
/// Student cancellation of their own still-pending request.
async fn cancel_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.bookings.cancel(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
