use axum::{extract::State, routing::get, Extension, Json, Router};
use dormhub_booking::model::BookingView;
use dormhub_core::identity::Actor;
use dormhub_listing::model::Listing;

use crate::error::AppError;
use crate::state::AppState;

/// Owner dashboard surface, nested under /v1/owner behind the owner gate.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/hostels", get(my_hostels))
        .route("/bookings", get(incoming_bookings))
}

/// GET /v1/owner/hostels
async fn my_hostels(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<Listing>>, AppError> {
    Ok(Json(state.listings.list_for_owner(actor.id).await?))
}

/// GET /v1/owner/bookings
/// Requests against the caller's listings, joined with student display data.
async fn incoming_bookings(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    Ok(Json(state.bookings.list_for_owner(&actor).await?))
}
