use std::sync::Arc;

use dormhub_assistant::AssistantClient;
use dormhub_booking::BookingService;
use dormhub_core::repository::{NotificationRepository, ProfileRepository};
use dormhub_listing::ListingService;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub listings: Arc<ListingService>,
    pub bookings: Arc<BookingService>,
    pub assistant: Arc<AssistantClient>,
    pub auth: AuthConfig,
}
