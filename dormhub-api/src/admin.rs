use axum::{extract::State, routing::get, Extension, Json, Router};
use dormhub_booking::model::BookingView;
use dormhub_core::identity::{Actor, Profile};
use dormhub_listing::model::Listing;

use crate::error::AppError;
use crate::state::AppState;

/// Admin back-office surface, nested under /v1/admin behind the admin gate.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(all_bookings))
        .route("/hostels", get(all_hostels))
        .route("/profiles", get(all_profiles))
}

/// GET /v1/admin/bookings
async fn all_bookings(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    Ok(Json(state.bookings.list_all(&actor).await?))
}

/// GET /v1/admin/hostels
async fn all_hostels(State(state): State<AppState>) -> Result<Json<Vec<Listing>>, AppError> {
    Ok(Json(state.listings.list().await?))
}

/// GET /v1/admin/profiles
async fn all_profiles(State(state): State<AppState>) -> Result<Json<Vec<Profile>>, AppError> {
    let profiles = state
        .profiles
        .list_all()
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    Ok(Json(profiles))
}
