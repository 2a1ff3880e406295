use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod assistant;
pub mod auth;
pub mod bookings;
pub mod error;
pub mod listings;
pub mod middleware;
pub mod notifications;
pub mod owner;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    // Everything except signup/login sits behind the auth layer, which
    // resolves the caller once and injects it into request extensions.
    let session = Router::new()
        .merge(auth::session_routes())
        .merge(listings::routes())
        .merge(bookings::routes())
        .merge(assistant::routes())
        .merge(notifications::routes())
        .nest(
            "/v1/owner",
            owner::routes().route_layer(axum::middleware::from_fn(middleware::require_owner)),
        )
        .nest(
            "/v1/admin",
            admin::routes().route_layer(axum::middleware::from_fn(middleware::require_admin)),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .merge(auth::routes())
        .merge(session)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
