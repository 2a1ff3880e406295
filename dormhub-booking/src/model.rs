use chrono::{DateTime, Utc};
use dormhub_shared::Masked;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Booking status in the lifecycle. Pending is the only non-terminal state;
/// approved and rejected admit no further transitions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
}

impl BookingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Approved | BookingStatus::Rejected)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(BookingStatus::Pending),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            other => Err(format!("unknown booking status: {}", other)),
        }
    }
}

/// One student's request to reserve a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub hostel_id: Uuid,
    pub student_id: Uuid,
    pub status: BookingStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(hostel_id: Uuid, student_id: Uuid, message: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            hostel_id,
            student_id,
            status: BookingStatus::Pending,
            message,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Booking joined with listing and student display data, as shown on the
/// owner and admin dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub id: Uuid,
    pub hostel_id: Uuid,
    pub student_id: Uuid,
    pub status: BookingStatus,
    pub message: Option<String>,
    pub hostel_name: String,
    pub hostel_location: String,
    pub hostel_price: i32,
    pub student_name: String,
    pub student_phone: Masked<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    #[error("booking not found: {0}")]
    BookingNotFound(Uuid),

    #[error("listing not found: {0}")]
    ListingNotFound(Uuid),

    #[error("invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("a pending request for this hostel already exists")]
    DuplicateRequest,

    #[error("storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Approved,
            BookingStatus::Rejected,
        ] {
            assert_eq!(status.to_string().parse::<BookingStatus>().unwrap(), status);
        }
    }

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(BookingStatus::Approved.is_terminal());
        assert!(BookingStatus::Rejected.is_terminal());
    }

    #[test]
    fn new_booking_starts_pending() {
        let booking = Booking::new(Uuid::new_v4(), Uuid::new_v4(), None);
        assert_eq!(booking.status, BookingStatus::Pending);
    }
}
