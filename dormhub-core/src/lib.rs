pub mod identity;
pub mod notify;
pub mod repository;

pub use identity::{Actor, Profile, Role};
pub use notify::Notification;

/// One rejected form field, reported back to the submitting user.
#[derive(Debug, Clone, serde::Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}
