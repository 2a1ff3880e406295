use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use dormhub_core::identity::Actor;
use dormhub_listing::model::{Amenities, Listing, ListingDraft};
use dormhub_listing::SearchFilter;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub location: Option<String>,
    pub min_price: Option<i32>,
    pub max_price: Option<i32>,
    #[serde(default)]
    pub wifi: bool,
    #[serde(default)]
    pub water: bool,
    #[serde(default)]
    pub electricity: bool,
    #[serde(default)]
    pub security: bool,
    #[serde(default)]
    pub furniture: bool,
    #[serde(default)]
    pub kitchen: bool,
    #[serde(default)]
    pub bathroom: bool,
}

impl From<SearchQuery> for SearchFilter {
    fn from(q: SearchQuery) -> Self {
        SearchFilter {
            location: q.location,
            min_price: q.min_price,
            max_price: q.max_price,
            amenities: Amenities {
                wifi: q.wifi,
                water: q.water,
                electricity: q.electricity,
                security: q.security,
                furniture: q.furniture,
                kitchen: q.kitchen,
                bathroom: q.bathroom,
            },
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/hostels", get(list_hostels).post(create_hostel))
        .route("/v1/hostels/search", get(search_hostels))
        .route(
            "/v1/hostels/{id}",
            get(get_hostel).put(update_hostel).delete(delete_hostel),
        )
}

/// GET /v1/hostels
async fn list_hostels(State(state): State<AppState>) -> Result<Json<Vec<Listing>>, AppError> {
    Ok(Json(state.listings.list().await?))
}

/// GET /v1/hostels/search
async fn search_hostels(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Listing>>, AppError> {
    let filter: SearchFilter = query.into();
    Ok(Json(state.listings.search(&filter).await?))
}

/// GET /v1/hostels/:id
async fn get_hostel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Listing>, AppError> {
    Ok(Json(state.listings.get(id).await?))
}

/// POST /v1/hostels
async fn create_hostel(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(draft): Json<ListingDraft>,
) -> Result<Json<Listing>, AppError> {
    Ok(Json(state.listings.create(&actor, draft).await?))
}

/// PUT /v1/hostels/:id
async fn update_hostel(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(draft): Json<ListingDraft>,
) -> Result<Json<Listing>, AppError> {
    Ok(Json(state.listings.update(&actor, id, draft).await?))
}

/// DELETE /v1/hostels/:id
async fn delete_hostel(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.listings.delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
