pub mod model;
pub mod repository;
pub mod service;

pub use model::{Booking, BookingError, BookingStatus, BookingView};
pub use repository::BookingRepository;
pub use service::BookingService;
