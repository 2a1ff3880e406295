use async_trait::async_trait;
use uuid::Uuid;

use crate::model::Listing;

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for listing data access. Amenities and images travel
/// with the listing; `update` replaces them wholesale and `delete` cascades
/// to them and to every booking referencing the listing.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn insert(&self, listing: &Listing) -> Result<(), RepoError>;

    async fn get(&self, id: Uuid) -> Result<Option<Listing>, RepoError>;

    async fn list_all(&self) -> Result<Vec<Listing>, RepoError>;

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, RepoError>;

    async fn update(&self, listing: &Listing) -> Result<bool, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;
}
