pub mod model;
pub mod repository;
pub mod search;
pub mod service;

pub use model::{Amenities, Listing, ListingDraft, ListingError, ListingImage};
pub use repository::ListingRepository;
pub use search::SearchFilter;
pub use service::ListingService;
