use serde::{Deserialize, Serialize};

use crate::model::{Amenities, Listing};

/// Search criteria over the published listing set. Empty filter matches
/// everything; no pagination, the full result set is returned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilter {
    pub location: Option<String>,
    pub min_price: Option<i32>,
    pub max_price: Option<i32>,
    #[serde(default)]
    pub amenities: Amenities,
}

impl SearchFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(ref needle) = self.location {
            if !listing
                .location
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if listing.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if listing.price > max {
                return false;
            }
        }
        listing.amenities.covers(&self.amenities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn listing(location: &str, price: i32, wifi: bool) -> Listing {
        let now = Utc::now();
        Listing {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Test Hostel".to_string(),
            location: location.to_string(),
            price,
            rooms: 4,
            description: None,
            amenities: Amenities { wifi, ..Default::default() },
            images: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(SearchFilter::default().matches(&listing("Ayeduase", 100, false)));
    }

    #[test]
    fn location_match_is_case_insensitive_substring() {
        let filter = SearchFilter { location: Some("ayedu".to_string()), ..Default::default() };
        assert!(filter.matches(&listing("Ayeduase New Site", 100, false)));
        assert!(!filter.matches(&listing("Bomso", 100, false)));
    }

    #[test]
    fn price_band_and_required_amenities() {
        let filter = SearchFilter {
            min_price: Some(200),
            max_price: Some(400),
            amenities: Amenities { wifi: true, ..Default::default() },
            ..Default::default()
        };
        assert!(filter.matches(&listing("Ayeduase", 300, true)));
        assert!(filter.matches(&listing("Ayeduase", 200, true)));
        assert!(filter.matches(&listing("Ayeduase", 400, true)));
        // Price out of band.
        assert!(!filter.matches(&listing("Ayeduase", 500, true)));
        // Amenity missing.
        assert!(!filter.matches(&listing("Ayeduase", 300, false)));
    }
}
