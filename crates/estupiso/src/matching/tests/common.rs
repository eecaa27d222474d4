use std::collections::BTreeSet;

use crate::domain::ListingId;
use crate::matching::{
    AffinityTable, Cleanliness, CompatibilityEngine, Listing, OwnerPreferences, Person, Schedule,
};

pub(super) fn engine() -> CompatibilityEngine {
    CompatibilityEngine::new(AffinityTable::standard())
}

pub(super) fn blank(id: &str) -> Person {
    Person::new(id)
}

/// Tidy, normal-schedule student looking in Centro with no habits.
pub(super) fn tidy_student(id: &str) -> Person {
    Person {
        zone: Some("Centro".to_string()),
        cleanliness: Some(Cleanliness::Tidy),
        schedule: Some(Schedule::Normal),
        ..Person::new(id)
    }
}

pub(super) fn interests(tags: &[&str]) -> BTreeSet<String> {
    tags.iter().map(|tag| tag.to_string()).collect()
}

pub(super) fn listing(id: &str, monthly_price: u32, zone: &str) -> Listing {
    Listing {
        id: ListingId(id.to_string()),
        monthly_price,
        zone: zone.to_string(),
        owner_preferences: None,
        current_occupant: None,
    }
}

pub(super) fn with_preferences(mut listing: Listing, preferences: OwnerPreferences) -> Listing {
    listing.owner_preferences = Some(preferences);
    listing
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
