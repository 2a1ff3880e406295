use std::net::SocketAddr;
use std::sync::Arc;

use dormhub_api::{app, state::AuthConfig, AppState};
use dormhub_assistant::AssistantClient;
use dormhub_booking::BookingService;
use dormhub_listing::ListingService;
use dormhub_store::{
    DbClient, PgBookingRepository, PgListingRepository, PgNotificationRepository,
    PgProfileRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dormhub_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = dormhub_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting DormHub API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let listings_repo = Arc::new(PgListingRepository::new(db.pool.clone()));
    let bookings_repo = Arc::new(PgBookingRepository::new(db.pool.clone()));
    let notifications_repo = Arc::new(PgNotificationRepository::new(db.pool.clone()));
    let profiles_repo = Arc::new(PgProfileRepository::new(db.pool.clone()));

    let app_state = AppState {
        profiles: profiles_repo,
        notifications: notifications_repo.clone(),
        listings: Arc::new(ListingService::new(listings_repo.clone())),
        bookings: Arc::new(BookingService::new(
            bookings_repo,
            listings_repo,
            notifications_repo,
        )),
        assistant: Arc::new(AssistantClient::new(config.assistant.clone())),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
