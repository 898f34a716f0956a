use serde::Deserialize;
use validator::Validate;

use crate::models::domain::{Listing, PropertyRequest};

/// A new listing was posted; alert the requests it satisfies
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListingEventRequest {
    pub listing: Listing,
    /// Requests to match against; fetched from storage when absent
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub candidates: Option<Vec<PropertyRequest>>,
    #[serde(alias = "dry_run", rename = "dryRun", default)]
    pub dry_run: bool,
}

/// A new property request was posted; alert the owners of matching listings
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PropertyRequestEvent {
    pub request: PropertyRequest,
    /// Listings to match against; fetched from storage when absent
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub candidates: Option<Vec<Listing>>,
    #[serde(alias = "dry_run", rename = "dryRun", default)]
    pub dry_run: bool,
}

/// Evaluate a single pair without sending anything
#[derive(Debug, Clone, Deserialize)]
pub struct CheckMatchRequest {
    pub request: PropertyRequest,
    pub listing: Listing,
}
