use std::sync::Arc;

use chrono::Utc;
use dormhub_core::identity::{Actor, Role};
use dormhub_core::notify::Notification;
use dormhub_core::repository::NotificationRepository;
use dormhub_listing::ListingRepository;
use tracing::{info, warn};
use uuid::Uuid;

use crate::model::{Booking, BookingError, BookingStatus, BookingView};
use crate::repository::BookingRepository;

/// Owns the booking lifecycle: creation, per-role listing, the
/// pending → approved/rejected decision and student cancellation.
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    listings: Arc<dyn ListingRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        listings: Arc<dyn ListingRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            bookings,
            listings,
            notifications,
        }
    }

    /// Creates a pending request against an existing listing. Strictly
    /// student-only: owners and admins cannot request bookings.
    pub async fn create(
        &self,
        actor: &Actor,
        hostel_id: Uuid,
        message: Option<String>,
    ) -> Result<Booking, BookingError> {
        if actor.role != Role::Student {
            return Err(BookingError::NotAuthorized(
                "only students may request bookings".to_string(),
            ));
        }

        let listing = self
            .listings
            .get(hostel_id)
            .await
            .map_err(storage)?
            .ok_or(BookingError::ListingNotFound(hostel_id))?;

        if self
            .bookings
            .find_pending(actor.id, hostel_id)
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(BookingError::DuplicateRequest);
        }

        let booking = Booking::new(hostel_id, actor.id, message);
        self.bookings.insert(&booking).await.map_err(storage)?;
        info!(booking_id = %booking.id, hostel_id = %hostel_id, "booking requested");

        self.notify(
            listing.owner_id,
            "New booking request",
            format!("A student has requested a room at {}", listing.name),
        )
        .await;

        Ok(booking)
    }

    pub async fn list_for_student(&self, actor: &Actor) -> Result<Vec<BookingView>, BookingError> {
        self.bookings
            .list_for_student(actor.id)
            .await
            .map_err(storage)
    }

    pub async fn list_for_owner(&self, actor: &Actor) -> Result<Vec<BookingView>, BookingError> {
        self.bookings.list_for_owner(actor.id).await.map_err(storage)
    }

    pub async fn list_all(&self, actor: &Actor) -> Result<Vec<BookingView>, BookingError> {
        if actor.role != Role::Admin {
            return Err(BookingError::NotAuthorized(
                "admin access required".to_string(),
            ));
        }
        self.bookings.list_all().await.map_err(storage)
    }

    /// Decides a pending request. Only the listing's owner or an admin may
    /// decide, only into approved or rejected, and only while the booking is
    /// still pending — the update is conditional, so a racing cancel or a
    /// second decision loses cleanly instead of overwriting.
    pub async fn set_status(
        &self,
        actor: &Actor,
        booking_id: Uuid,
        new_status: BookingStatus,
    ) -> Result<Booking, BookingError> {
        let mut booking = self
            .bookings
            .get(booking_id)
            .await
            .map_err(storage)?
            .ok_or(BookingError::BookingNotFound(booking_id))?;

        let listing = self
            .listings
            .get(booking.hostel_id)
            .await
            .map_err(storage)?
            .ok_or(BookingError::ListingNotFound(booking.hostel_id))?;

        if listing.owner_id != actor.id && actor.role != Role::Admin {
            return Err(BookingError::NotAuthorized(
                "booking belongs to another owner's listing".to_string(),
            ));
        }

        if new_status == BookingStatus::Pending || booking.status.is_terminal() {
            return Err(BookingError::InvalidTransition {
                from: booking.status.to_string(),
                to: new_status.to_string(),
            });
        }

        let applied = self
            .bookings
            .update_status_if_pending(booking_id, new_status)
            .await
            .map_err(storage)?;
        if !applied {
            // Lost the race to a cancel or another decision.
            return Err(BookingError::InvalidTransition {
                from: booking.status.to_string(),
                to: new_status.to_string(),
            });
        }

        booking.status = new_status;
        booking.updated_at = Utc::now();
        info!(booking_id = %booking_id, status = %new_status, "booking decided");

        let title = match new_status {
            BookingStatus::Approved => "Booking approved",
            _ => "Booking rejected",
        };
        self.notify(
            booking.student_id,
            title,
            format!("Your request for {} was {}", listing.name, new_status),
        )
        .await;

        Ok(booking)
    }

    /// Student cancellation: deletes the caller's own booking while it is
    /// still pending. Decided bookings are immutable to the student.
    pub async fn cancel(&self, actor: &Actor, booking_id: Uuid) -> Result<(), BookingError> {
        let booking = self
            .bookings
            .get(booking_id)
            .await
            .map_err(storage)?
            .ok_or(BookingError::BookingNotFound(booking_id))?;

        if booking.student_id != actor.id {
            return Err(BookingError::NotAuthorized(
                "booking belongs to another student".to_string(),
            ));
        }

        if booking.status.is_terminal() {
            return Err(BookingError::InvalidTransition {
                from: booking.status.to_string(),
                to: "DELETED".to_string(),
            });
        }

        let removed = self
            .bookings
            .delete_if_pending(booking_id)
            .await
            .map_err(storage)?;
        if !removed {
            return Err(BookingError::InvalidTransition {
                from: booking.status.to_string(),
                to: "DELETED".to_string(),
            });
        }
        info!(booking_id = %booking_id, "booking cancelled");
        Ok(())
    }

    // Notification delivery is best-effort; a failed push never fails the
    // booking operation itself.
    async fn notify(&self, user_id: Uuid, title: &str, message: String) {
        let note = Notification::new(user_id, title, message);
        if let Err(e) = self.notifications.push(&note).await {
            warn!(user_id = %user_id, "failed to push notification: {}", e);
        }
    }
}

fn storage(e: crate::repository::RepoError) -> BookingError {
    BookingError::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dormhub_core::repository::RepoError;
    use dormhub_listing::model::{Amenities, Listing, ListingDraft};
    use dormhub_listing::ListingService;
    use dormhub_shared::Masked;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// One shared in-memory store backing all three repository traits, so
    /// listing deletion can cascade over bookings the way the schema does.
    #[derive(Default)]
    struct MemStore {
        listings: Mutex<HashMap<Uuid, Listing>>,
        bookings: Mutex<HashMap<Uuid, Booking>>,
        students: Mutex<HashMap<Uuid, (String, String)>>,
        notes: Mutex<Vec<Notification>>,
    }

    impl MemStore {
        fn register_student(&self, id: Uuid, name: &str, phone: &str) {
            self.students
                .lock()
                .unwrap()
                .insert(id, (name.to_string(), phone.to_string()));
        }

        fn booking(&self, id: Uuid) -> Option<Booking> {
            self.bookings.lock().unwrap().get(&id).cloned()
        }

        fn notes_for(&self, user_id: Uuid) -> Vec<Notification> {
            self.notes
                .lock()
                .unwrap()
                .iter()
                .filter(|n| n.user_id == user_id)
                .cloned()
                .collect()
        }

        fn view(&self, booking: &Booking) -> BookingView {
            let listings = self.listings.lock().unwrap();
            let hostel = listings.get(&booking.hostel_id).expect("hostel row");
            let students = self.students.lock().unwrap();
            let (name, phone) = students
                .get(&booking.student_id)
                .cloned()
                .unwrap_or_else(|| ("Unknown".to_string(), String::new()));
            BookingView {
                id: booking.id,
                hostel_id: booking.hostel_id,
                student_id: booking.student_id,
                status: booking.status,
                message: booking.message.clone(),
                hostel_name: hostel.name.clone(),
                hostel_location: hostel.location.clone(),
                hostel_price: hostel.price,
                student_name: name,
                student_phone: Masked(phone),
                created_at: booking.created_at,
                updated_at: booking.updated_at,
            }
        }

        fn sorted(&self, mut rows: Vec<Booking>) -> Vec<BookingView> {
            rows.sort_by_key(|b| b.created_at);
            rows.iter().map(|b| self.view(b)).collect()
        }
    }

    #[async_trait]
    impl dormhub_listing::ListingRepository for MemStore {
        async fn insert(&self, listing: &Listing) -> Result<(), RepoError> {
            self.listings.lock().unwrap().insert(listing.id, listing.clone());
            Ok(())
        }

        async fn get(&self, id: Uuid) -> Result<Option<Listing>, RepoError> {
            Ok(self.listings.lock().unwrap().get(&id).cloned())
        }

        async fn list_all(&self) -> Result<Vec<Listing>, RepoError> {
            Ok(self.listings.lock().unwrap().values().cloned().collect())
        }

        async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, RepoError> {
            let mut all: Vec<_> = self.listings.lock().unwrap().values().cloned().collect();
            all.retain(|l| l.owner_id == owner_id);
            Ok(all)
        }

        async fn update(&self, listing: &Listing) -> Result<bool, RepoError> {
            let mut rows = self.listings.lock().unwrap();
            if rows.contains_key(&listing.id) {
                rows.insert(listing.id, listing.clone());
                Ok(true)
            } else {
                Ok(false)
            }
        }

        async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
            let removed = self.listings.lock().unwrap().remove(&id).is_some();
            if removed {
                // Mirror the schema's ON DELETE CASCADE.
                self.bookings.lock().unwrap().retain(|_, b| b.hostel_id != id);
            }
            Ok(removed)
        }
    }

    #[async_trait]
    impl BookingRepository for MemStore {
        async fn insert(&self, booking: &Booking) -> Result<(), RepoError> {
            self.bookings.lock().unwrap().insert(booking.id, booking.clone());
            Ok(())
        }

        async fn get(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
            Ok(self.bookings.lock().unwrap().get(&id).cloned())
        }

        async fn find_pending(
            &self,
            student_id: Uuid,
            hostel_id: Uuid,
        ) -> Result<Option<Booking>, RepoError> {
            Ok(self
                .bookings
                .lock()
                .unwrap()
                .values()
                .find(|b| {
                    b.student_id == student_id
                        && b.hostel_id == hostel_id
                        && b.status == BookingStatus::Pending
                })
                .cloned())
        }

        async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<BookingView>, RepoError> {
            let rows: Vec<_> = self
                .bookings
                .lock()
                .unwrap()
                .values()
                .filter(|b| b.student_id == student_id)
                .cloned()
                .collect();
            Ok(self.sorted(rows))
        }

        async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<BookingView>, RepoError> {
            let owned: Vec<Uuid> = self
                .listings
                .lock()
                .unwrap()
                .values()
                .filter(|l| l.owner_id == owner_id)
                .map(|l| l.id)
                .collect();
            let rows: Vec<_> = self
                .bookings
                .lock()
                .unwrap()
                .values()
                .filter(|b| owned.contains(&b.hostel_id))
                .cloned()
                .collect();
            Ok(self.sorted(rows))
        }

        async fn list_all(&self) -> Result<Vec<BookingView>, RepoError> {
            let rows: Vec<_> = self.bookings.lock().unwrap().values().cloned().collect();
            Ok(self.sorted(rows))
        }

        async fn update_status_if_pending(
            &self,
            id: Uuid,
            status: BookingStatus,
        ) -> Result<bool, RepoError> {
            let mut rows = self.bookings.lock().unwrap();
            match rows.get_mut(&id) {
                Some(b) if b.status == BookingStatus::Pending => {
                    b.status = status;
                    b.updated_at = Utc::now();
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn delete_if_pending(&self, id: Uuid) -> Result<bool, RepoError> {
            let mut rows = self.bookings.lock().unwrap();
            match rows.get(&id) {
                Some(b) if b.status == BookingStatus::Pending => {
                    rows.remove(&id);
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
    }

    #[async_trait]
    impl NotificationRepository for MemStore {
        async fn push(&self, notification: &Notification) -> Result<(), RepoError> {
            self.notes.lock().unwrap().push(notification.clone());
            Ok(())
        }

        async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, RepoError> {
            let mut rows: Vec<_> = self
                .notes
                .lock()
                .unwrap()
                .iter()
                .filter(|n| n.user_id == user_id)
                .cloned()
                .collect();
            rows.sort_by_key(|n| n.created_at);
            Ok(rows)
        }

        async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
            let mut rows = self.notes.lock().unwrap();
            match rows.iter_mut().find(|n| n.id == id && n.user_id == user_id) {
                Some(n) => {
                    n.is_read = true;
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    struct Fixture {
        store: Arc<MemStore>,
        bookings: BookingService,
        listings: ListingService,
        student: Actor,
        owner: Actor,
        admin: Actor,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemStore::default());
        let bookings = BookingService::new(store.clone(), store.clone(), store.clone());
        let listings = ListingService::new(store.clone());
        let student = Actor { id: Uuid::new_v4(), role: Role::Student };
        let owner = Actor { id: Uuid::new_v4(), role: Role::Owner };
        let admin = Actor { id: Uuid::new_v4(), role: Role::Admin };
        store.register_student(student.id, "Ama Mensah", "0241234567");
        Fixture { store, bookings, listings, student, owner, admin }
    }

    async fn publish(fx: &Fixture, owner: &Actor, name: &str) -> Listing {
        fx.listings
            .create(
                owner,
                ListingDraft {
                    name: name.to_string(),
                    location: "Ayeduase".to_string(),
                    price: 350,
                    rooms: 8,
                    description: None,
                    amenities: Amenities { wifi: true, ..Default::default() },
                    images: vec![],
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn student_request_starts_pending_and_notifies_owner() {
        let fx = fixture();
        let listing = publish(&fx, &fx.owner, "Sunrise Hostel").await;

        let booking = fx
            .bookings
            .create(&fx.student, listing.id, Some("2-person room please".to_string()))
            .await
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);

        let owner_notes = fx.store.notes_for(fx.owner.id);
        assert_eq!(owner_notes.len(), 1);
        assert_eq!(owner_notes[0].title, "New booking request");
    }

    #[tokio::test]
    async fn only_students_may_request() {
        let fx = fixture();
        let listing = publish(&fx, &fx.owner, "Sunrise Hostel").await;

        for actor in [&fx.owner, &fx.admin] {
            let err = fx.bookings.create(actor, listing.id, None).await.unwrap_err();
            assert!(matches!(err, BookingError::NotAuthorized(_)));
        }
    }

    #[tokio::test]
    async fn request_against_missing_listing_fails() {
        let fx = fixture();
        let err = fx
            .bookings
            .create(&fx.student, Uuid::new_v4(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::ListingNotFound(_)));
    }

    #[tokio::test]
    async fn duplicate_pending_request_is_rejected() {
        let fx = fixture();
        let listing = publish(&fx, &fx.owner, "Sunrise Hostel").await;

        fx.bookings.create(&fx.student, listing.id, None).await.unwrap();
        let err = fx
            .bookings
            .create(&fx.student, listing.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::DuplicateRequest));
    }

    #[tokio::test]
    async fn rejected_request_allows_a_fresh_one() {
        let fx = fixture();
        let listing = publish(&fx, &fx.owner, "Sunrise Hostel").await;

        let first = fx.bookings.create(&fx.student, listing.id, None).await.unwrap();
        fx.bookings
            .set_status(&fx.owner, first.id, BookingStatus::Rejected)
            .await
            .unwrap();

        // The rejected row is terminal, not pending, so a new request may be made.
        fx.bookings.create(&fx.student, listing.id, None).await.unwrap();
    }

    #[tokio::test]
    async fn owner_approval_locks_out_student_cancel() {
        let fx = fixture();
        let listing = publish(&fx, &fx.owner, "Sunrise Hostel").await;
        let booking = fx.bookings.create(&fx.student, listing.id, None).await.unwrap();

        let decided = fx
            .bookings
            .set_status(&fx.owner, booking.id, BookingStatus::Approved)
            .await
            .unwrap();
        assert_eq!(decided.status, BookingStatus::Approved);

        let err = fx.bookings.cancel(&fx.student, booking.id).await.unwrap_err();
        assert!(matches!(err, BookingError::InvalidTransition { .. }));

        let student_notes = fx.store.notes_for(fx.student.id);
        assert_eq!(student_notes.len(), 1);
        assert_eq!(student_notes[0].title, "Booking approved");
    }

    #[tokio::test]
    async fn unrelated_owner_cannot_decide() {
        let fx = fixture();
        let listing = publish(&fx, &fx.owner, "Sunrise Hostel").await;
        let booking = fx.bookings.create(&fx.student, listing.id, None).await.unwrap();

        let other_owner = Actor { id: Uuid::new_v4(), role: Role::Owner };
        let err = fx
            .bookings
            .set_status(&other_owner, booking.id, BookingStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::NotAuthorized(_)));

        // Status untouched.
        let current = fx.store.booking(booking.id).unwrap();
        assert_eq!(current.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn admin_may_decide_any_booking() {
        let fx = fixture();
        let listing = publish(&fx, &fx.owner, "Sunrise Hostel").await;
        let booking = fx.bookings.create(&fx.student, listing.id, None).await.unwrap();

        let decided = fx
            .bookings
            .set_status(&fx.admin, booking.id, BookingStatus::Rejected)
            .await
            .unwrap();
        assert_eq!(decided.status, BookingStatus::Rejected);
    }

    #[tokio::test]
    async fn deciding_a_terminal_booking_fails_and_changes_nothing() {
        let fx = fixture();
        let listing = publish(&fx, &fx.owner, "Sunrise Hostel").await;
        let booking = fx.bookings.create(&fx.student, listing.id, None).await.unwrap();
        fx.bookings
            .set_status(&fx.owner, booking.id, BookingStatus::Approved)
            .await
            .unwrap();

        let err = fx
            .bookings
            .set_status(&fx.owner, booking.id, BookingStatus::Rejected)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidTransition { .. }));

        let current = fx.store.booking(booking.id).unwrap();
        assert_eq!(current.status, BookingStatus::Approved);
    }

    #[tokio::test]
    async fn pending_is_not_a_valid_decision_target() {
        let fx = fixture();
        let listing = publish(&fx, &fx.owner, "Sunrise Hostel").await;
        let booking = fx.bookings.create(&fx.student, listing.id, None).await.unwrap();

        let err = fx
            .bookings
            .set_status(&fx.owner, booking.id, BookingStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn student_cancels_own_pending_booking() {
        let fx = fixture();
        let listing = publish(&fx, &fx.owner, "Sunrise Hostel").await;
        let booking = fx.bookings.create(&fx.student, listing.id, None).await.unwrap();

        fx.bookings.cancel(&fx.student, booking.id).await.unwrap();
        assert!(fx.store.booking(booking.id).is_none());
    }

    #[tokio::test]
    async fn student_cannot_cancel_someone_elses_booking() {
        let fx = fixture();
        let listing = publish(&fx, &fx.owner, "Sunrise Hostel").await;
        let booking = fx.bookings.create(&fx.student, listing.id, None).await.unwrap();

        let other = Actor { id: Uuid::new_v4(), role: Role::Student };
        let err = fx.bookings.cancel(&other, booking.id).await.unwrap_err();
        assert!(matches!(err, BookingError::NotAuthorized(_)));
    }

    #[tokio::test]
    async fn visibility_is_scoped_to_student_owner_and_admin() {
        let fx = fixture();
        let other_owner = Actor { id: Uuid::new_v4(), role: Role::Owner };
        let other_student = Actor { id: Uuid::new_v4(), role: Role::Student };
        fx.store.register_student(other_student.id, "Kofi Adu", "0209876543");

        let mine = publish(&fx, &fx.owner, "Sunrise Hostel").await;
        let theirs = publish(&fx, &other_owner, "Moonlight Lodge").await;

        fx.bookings.create(&fx.student, mine.id, None).await.unwrap();
        fx.bookings.create(&other_student, theirs.id, None).await.unwrap();

        let student_rows = fx.bookings.list_for_student(&fx.student).await.unwrap();
        assert_eq!(student_rows.len(), 1);
        assert_eq!(student_rows[0].hostel_name, "Sunrise Hostel");

        let owner_rows = fx.bookings.list_for_owner(&fx.owner).await.unwrap();
        assert_eq!(owner_rows.len(), 1);
        assert_eq!(owner_rows[0].student_name, "Ama Mensah");

        // Admin sees bookings across owners and students.
        let all = fx.bookings.list_all(&fx.admin).await.unwrap();
        assert_eq!(all.len(), 2);

        let err = fx.bookings.list_all(&fx.owner).await.unwrap_err();
        assert!(matches!(err, BookingError::NotAuthorized(_)));
    }

    #[tokio::test]
    async fn deleting_a_listing_cascades_over_its_bookings() {
        let fx = fixture();
        let listing = publish(&fx, &fx.owner, "Sunrise Hostel").await;
        fx.bookings.create(&fx.student, listing.id, None).await.unwrap();

        fx.listings.delete(&fx.owner, listing.id).await.unwrap();

        assert!(fx.bookings.list_for_student(&fx.student).await.unwrap().is_empty());
        assert!(fx.bookings.list_for_owner(&fx.owner).await.unwrap().is_empty());
    }
}
