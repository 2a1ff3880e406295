use chrono::{DateTime, Utc};
use dormhub_core::FieldError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Amenity flags carried by every listing. Owned by the listing; deleting
/// the listing deletes these with it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Amenities {
    pub wifi: bool,
    pub water: bool,
    pub electricity: bool,
    pub security: bool,
    pub furniture: bool,
    pub kitchen: bool,
    pub bathroom: bool,
}

impl Amenities {
    /// True when every flag set in `required` is also set here.
    pub fn covers(&self, required: &Amenities) -> bool {
        (!required.wifi || self.wifi)
            && (!required.water || self.water)
            && (!required.electricity || self.electricity)
            && (!required.security || self.security)
            && (!required.furniture || self.furniture)
            && (!required.kitchen || self.kitchen)
            && (!required.bathroom || self.bathroom)
    }
}

/// One image attached to a listing, in display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingImage {
    pub image_url: String,
    pub is_primary: bool,
}

/// A hostel property published by one owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub location: String,
    /// Monthly price in minor currency units.
    pub price: i32,
    pub rooms: i32,
    pub description: Option<String>,
    pub amenities: Amenities,
    pub images: Vec<ListingImage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submission-form fields for creating or replacing a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingDraft {
    pub name: String,
    pub location: String,
    pub price: i32,
    pub rooms: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amenities: Amenities,
    #[serde(default)]
    pub images: Vec<ListingImage>,
}

impl ListingDraft {
    /// Field-by-field form validation. All failing fields are reported.
    pub fn validate(&self) -> Result<(), ListingError> {
        let mut fields = Vec::new();
        if self.name.trim().is_empty() {
            fields.push(FieldError { field: "name", message: "name is required" });
        }
        if self.location.trim().is_empty() {
            fields.push(FieldError { field: "location", message: "location is required" });
        }
        if self.price <= 0 {
            fields.push(FieldError { field: "price", message: "price must be positive" });
        }
        if self.rooms <= 0 {
            fields.push(FieldError { field: "rooms", message: "rooms must be positive" });
        }
        if fields.is_empty() {
            Ok(())
        } else {
            Err(ListingError::Validation(fields))
        }
    }

    /// Materialize a validated draft into a new listing owned by `owner_id`.
    pub fn into_listing(self, owner_id: Uuid) -> Result<Listing, ListingError> {
        self.validate()?;
        let now = Utc::now();
        Ok(Listing {
            id: Uuid::new_v4(),
            owner_id,
            name: self.name,
            location: self.location,
            price: self.price,
            rooms: self.rooms,
            description: self.description,
            amenities: self.amenities,
            images: self.images,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    #[error("listing not found: {0}")]
    NotFound(Uuid),

    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ListingDraft {
        ListingDraft {
            name: "Sunrise Hostel".to_string(),
            location: "Ayeduase".to_string(),
            price: 3500,
            rooms: 12,
            description: None,
            amenities: Amenities::default(),
            images: vec![],
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn zero_price_and_rooms_are_rejected_field_by_field() {
        let mut d = draft();
        d.price = 0;
        d.rooms = 0;
        let err = d.validate().unwrap_err();
        match err {
            ListingError::Validation(fields) => {
                let names: Vec<_> = fields.iter().map(|f| f.field).collect();
                assert_eq!(names, vec!["price", "rooms"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn missing_name_is_rejected() {
        let mut d = draft();
        d.name = "   ".to_string();
        assert!(matches!(d.validate(), Err(ListingError::Validation(_))));
    }

    #[test]
    fn amenity_cover_requires_every_requested_flag() {
        let have = Amenities { wifi: true, water: true, ..Default::default() };
        let want_wifi = Amenities { wifi: true, ..Default::default() };
        let want_kitchen = Amenities { kitchen: true, ..Default::default() };
        assert!(have.covers(&want_wifi));
        assert!(!have.covers(&want_kitchen));
        assert!(have.covers(&Amenities::default()));
    }
}
