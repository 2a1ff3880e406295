use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dormhub_listing::model::{Amenities, Listing, ListingImage};
use dormhub_listing::repository::{ListingRepository, RepoError};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgListingRepository {
    pool: PgPool,
}

impl PgListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn hydrate(&self, row: HostelRow) -> Result<Listing, RepoError> {
        let amenities: Option<AmenityRow> =
            sqlx::query_as("SELECT wifi, water, electricity, security, furniture, kitchen, bathroom FROM amenities WHERE hostel_id = $1")
                .bind(row.id)
                .fetch_optional(&self.pool)
                .await?;

        let images: Vec<ImageRow> = sqlx::query_as(
            "SELECT image_url, is_primary FROM hostel_images WHERE hostel_id = $1 ORDER BY position",
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Listing {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            location: row.location,
            price: row.price,
            rooms: row.rooms,
            description: row.description,
            amenities: amenities.map(AmenityRow::into_amenities).unwrap_or_default(),
            images: images.into_iter().map(ImageRow::into_image).collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct HostelRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    location: String,
    price: i32,
    rooms: i32,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct AmenityRow {
    wifi: bool,
    water: bool,
    electricity: bool,
    security: bool,
    furniture: bool,
    kitchen: bool,
    bathroom: bool,
}

impl AmenityRow {
    fn into_amenities(self) -> Amenities {
        Amenities {
            wifi: self.wifi,
            water: self.water,
            electricity: self.electricity,
            security: self.security,
            furniture: self.furniture,
            kitchen: self.kitchen,
            bathroom: self.bathroom,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    image_url: String,
    is_primary: bool,
}

impl ImageRow {
    fn into_image(self) -> ListingImage {
        ListingImage {
            image_url: self.image_url,
            is_primary: self.is_primary,
        }
    }
}

const HOSTEL_COLUMNS: &str =
    "id, owner_id, name, location, price, rooms, description, created_at, updated_at";

async fn write_children(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    listing: &Listing,
) -> Result<(), sqlx::Error> {
    let a = &listing.amenities;
    sqlx::query(
        "INSERT INTO amenities (hostel_id, wifi, water, electricity, security, furniture, kitchen, bathroom) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(listing.id)
    .bind(a.wifi)
    .bind(a.water)
    .bind(a.electricity)
    .bind(a.security)
    .bind(a.furniture)
    .bind(a.kitchen)
    .bind(a.bathroom)
    .execute(&mut **tx)
    .await?;

    for (position, image) in listing.images.iter().enumerate() {
        sqlx::query(
            "INSERT INTO hostel_images (hostel_id, image_url, is_primary, position) VALUES ($1, $2, $3, $4)",
        )
        .bind(listing.id)
        .bind(&image.image_url)
        .bind(image.is_primary)
        .bind(position as i32)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl ListingRepository for PgListingRepository {
    async fn insert(&self, listing: &Listing) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO hostels (id, owner_id, name, location, price, rooms, description, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(listing.id)
        .bind(listing.owner_id)
        .bind(&listing.name)
        .bind(&listing.location)
        .bind(listing.price)
        .bind(listing.rooms)
        .bind(&listing.description)
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .execute(&mut *tx)
        .await?;

        write_children(&mut tx, listing).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Listing>, RepoError> {
        let row: Option<HostelRow> = sqlx::query_as(&format!(
            "SELECT {} FROM hostels WHERE id = $1",
            HOSTEL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Listing>, RepoError> {
        let rows: Vec<HostelRow> = sqlx::query_as(&format!(
            "SELECT {} FROM hostels ORDER BY created_at DESC",
            HOSTEL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut listings = Vec::with_capacity(rows.len());
        for row in rows {
            listings.push(self.hydrate(row).await?);
        }
        Ok(listings)
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, RepoError> {
        let rows: Vec<HostelRow> = sqlx::query_as(&format!(
            "SELECT {} FROM hostels WHERE owner_id = $1 ORDER BY created_at DESC",
            HOSTEL_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let mut listings = Vec::with_capacity(rows.len());
        for row in rows {
            listings.push(self.hydrate(row).await?);
        }
        Ok(listings)
    }

    async fn update(&self, listing: &Listing) -> Result<bool, RepoError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE hostels SET name = $1, location = $2, price = $3, rooms = $4, description = $5, updated_at = $6 \
             WHERE id = $7",
        )
        .bind(&listing.name)
        .bind(&listing.location)
        .bind(listing.price)
        .bind(listing.rooms)
        .bind(&listing.description)
        .bind(listing.updated_at)
        .bind(listing.id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        // Amenities and images are replaced wholesale, not merged.
        sqlx::query("DELETE FROM amenities WHERE hostel_id = $1")
            .bind(listing.id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM hostel_images WHERE hostel_id = $1")
            .bind(listing.id)
            .execute(&mut *tx)
            .await?;
        write_children(&mut tx, listing).await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        // Amenities, images and bookings go with the row via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM hostels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
