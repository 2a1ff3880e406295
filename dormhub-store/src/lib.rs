pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod listing_repo;
pub mod notification_repo;
pub mod profile_repo;

pub use booking_repo::PgBookingRepository;
pub use database::DbClient;
pub use listing_repo::PgListingRepository;
pub use notification_repo::PgNotificationRepository;
pub use profile_repo::PgProfileRepository;
