use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{Booking, BookingStatus, BookingView};

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for booking data access. Status mutation and student
/// cancellation are conditional on the row still being pending, so two
/// parties racing on the same booking cannot both win.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: &Booking) -> Result<(), RepoError>;

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, RepoError>;

    async fn find_pending(
        &self,
        student_id: Uuid,
        hostel_id: Uuid,
    ) -> Result<Option<Booking>, RepoError>;

    async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<BookingView>, RepoError>;

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<BookingView>, RepoError>;

    async fn list_all(&self) -> Result<Vec<BookingView>, RepoError>;

    /// Applies `status` only while the booking is still pending. Returns
    /// false when the row was already decided (or deleted) by someone else.
    async fn update_status_if_pending(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<bool, RepoError>;

    /// Deletes the booking only while it is still pending.
    async fn delete_if_pending(&self, id: Uuid) -> Result<bool, RepoError>;
}
