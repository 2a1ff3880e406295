use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dormhub_booking::model::{Booking, BookingStatus, BookingView};
use dormhub_booking::repository::{BookingRepository, RepoError};
use dormhub_shared::Masked;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    hostel_id: Uuid,
    student_id: Uuid,
    status: String,
    message: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking, RepoError> {
        Ok(Booking {
            id: self.id,
            hostel_id: self.hostel_id,
            student_id: self.student_id,
            status: self.status.parse().map_err(RepoError::from)?,
            message: self.message,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BookingViewRow {
    id: Uuid,
    hostel_id: Uuid,
    student_id: Uuid,
    status: String,
    message: Option<String>,
    hostel_name: String,
    hostel_location: String,
    hostel_price: i32,
    student_name: String,
    student_phone: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookingViewRow {
    fn into_view(self) -> Result<BookingView, RepoError> {
        Ok(BookingView {
            id: self.id,
            hostel_id: self.hostel_id,
            student_id: self.student_id,
            status: self.status.parse().map_err(RepoError::from)?,
            message: self.message,
            hostel_name: self.hostel_name,
            hostel_location: self.hostel_location,
            hostel_price: self.hostel_price,
            student_name: self.student_name,
            student_phone: Masked(self.student_phone),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const VIEW_SELECT: &str = "SELECT b.id, b.hostel_id, b.student_id, b.status, b.message, \
     h.name AS hostel_name, h.location AS hostel_location, h.price AS hostel_price, \
     p.full_name AS student_name, p.phone_number AS student_phone, \
     b.created_at, b.updated_at \
     FROM bookings b \
     JOIN hostels h ON h.id = b.hostel_id \
     JOIN profiles p ON p.id = b.student_id";

fn collect_views(rows: Vec<BookingViewRow>) -> Result<Vec<BookingView>, RepoError> {
    rows.into_iter().map(BookingViewRow::into_view).collect()
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO bookings (id, hostel_id, student_id, status, message, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(booking.id)
        .bind(booking.hostel_id)
        .bind(booking.student_id)
        .bind(booking.status.to_string())
        .bind(&booking.message)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        let row: Option<BookingRow> = sqlx::query_as(
            "SELECT id, hostel_id, student_id, status, message, created_at, updated_at \
             FROM bookings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(BookingRow::into_booking).transpose()
    }

    async fn find_pending(
        &self,
        student_id: Uuid,
        hostel_id: Uuid,
    ) -> Result<Option<Booking>, RepoError> {
        let row: Option<BookingRow> = sqlx::query_as(
            "SELECT id, hostel_id, student_id, status, message, created_at, updated_at \
             FROM bookings WHERE student_id = $1 AND hostel_id = $2 AND status = 'PENDING'",
        )
        .bind(student_id)
        .bind(hostel_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(BookingRow::into_booking).transpose()
    }

    async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<BookingView>, RepoError> {
        let rows: Vec<BookingViewRow> = sqlx::query_as(&format!(
            "{} WHERE b.student_id = $1 ORDER BY b.created_at DESC",
            VIEW_SELECT
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        collect_views(rows)
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<BookingView>, RepoError> {
        let rows: Vec<BookingViewRow> = sqlx::query_as(&format!(
            "{} WHERE h.owner_id = $1 ORDER BY b.created_at DESC",
            VIEW_SELECT
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        collect_views(rows)
    }

    async fn list_all(&self) -> Result<Vec<BookingView>, RepoError> {
        let rows: Vec<BookingViewRow> =
            sqlx::query_as(&format!("{} ORDER BY b.created_at DESC", VIEW_SELECT))
                .fetch_all(&self.pool)
                .await?;
        collect_views(rows)
    }

    async fn update_status_if_pending(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<bool, RepoError> {
        // Conditional transition: only a still-pending row can be decided.
        let result = sqlx::query(
            "UPDATE bookings SET status = $1, updated_at = NOW() WHERE id = $2 AND status = 'PENDING'",
        )
        .bind(status.to_string())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete_if_pending(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1 AND status = 'PENDING'")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
