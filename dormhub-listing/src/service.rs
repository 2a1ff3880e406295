use std::sync::Arc;

use chrono::Utc;
use dormhub_core::identity::Actor;
use tracing::info;
use uuid::Uuid;

use crate::model::{Listing, ListingDraft, ListingError};
use crate::repository::ListingRepository;
use crate::search::SearchFilter;

/// CRUD over listings, restricted to the owning account or an admin.
pub struct ListingService {
    listings: Arc<dyn ListingRepository>,
}

impl ListingService {
    pub fn new(listings: Arc<dyn ListingRepository>) -> Self {
        Self { listings }
    }

    pub async fn create(&self, actor: &Actor, draft: ListingDraft) -> Result<Listing, ListingError> {
        if !actor.role.can_own_listings() {
            return Err(ListingError::NotAuthorized(
                "only owners may publish listings".to_string(),
            ));
        }
        let listing = draft.into_listing(actor.id)?;
        self.listings
            .insert(&listing)
            .await
            .map_err(|e| ListingError::Storage(e.to_string()))?;
        info!(listing_id = %listing.id, owner_id = %actor.id, "listing created");
        Ok(listing)
    }

    pub async fn get(&self, id: Uuid) -> Result<Listing, ListingError> {
        self.listings
            .get(id)
            .await
            .map_err(|e| ListingError::Storage(e.to_string()))?
            .ok_or(ListingError::NotFound(id))
    }

    pub async fn list(&self) -> Result<Vec<Listing>, ListingError> {
        self.listings
            .list_all()
            .await
            .map_err(|e| ListingError::Storage(e.to_string()))
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, ListingError> {
        self.listings
            .list_for_owner(owner_id)
            .await
            .map_err(|e| ListingError::Storage(e.to_string()))
    }

    /// Replaces the mutable fields wholesale, amenities and images included.
    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        draft: ListingDraft,
    ) -> Result<Listing, ListingError> {
        let existing = self.get(id).await?;
        self.authorize(actor, &existing)?;
        draft.validate()?;

        let updated = Listing {
            id: existing.id,
            owner_id: existing.owner_id,
            name: draft.name,
            location: draft.location,
            price: draft.price,
            rooms: draft.rooms,
            description: draft.description,
            amenities: draft.amenities,
            images: draft.images,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        let applied = self
            .listings
            .update(&updated)
            .await
            .map_err(|e| ListingError::Storage(e.to_string()))?;
        if !applied {
            return Err(ListingError::NotFound(id));
        }
        Ok(updated)
    }

    /// Deletes the listing. Amenities, images and every booking referencing
    /// it go with it.
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), ListingError> {
        let existing = self.get(id).await?;
        self.authorize(actor, &existing)?;
        let removed = self
            .listings
            .delete(id)
            .await
            .map_err(|e| ListingError::Storage(e.to_string()))?;
        if !removed {
            return Err(ListingError::NotFound(id));
        }
        info!(listing_id = %id, "listing deleted");
        Ok(())
    }

    pub async fn search(&self, filter: &SearchFilter) -> Result<Vec<Listing>, ListingError> {
        let mut listings = self.list().await?;
        listings.retain(|l| filter.matches(l));
        Ok(listings)
    }

    fn authorize(&self, actor: &Actor, listing: &Listing) -> Result<(), ListingError> {
        if listing.owner_id == actor.id || actor.role == dormhub_core::Role::Admin {
            Ok(())
        } else {
            Err(ListingError::NotAuthorized(
                "listing belongs to another owner".to_string(),
            ))
        }
    }
}
