use crate::core::{
    budget::check_budget_overlap,
    distance::{calculate_bounding_box, distance_between, is_within_bounding_box},
};
use crate::models::{Listing, MatchVerdict, MatchedListing, MatchedRequest, PropertyRequest};

/// Default radius within which a listing counts as "nearby"
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 5.0;

/// Pairs property requests with listings
///
/// A pair matches when all three checks pass:
/// 1. Property type equality
/// 2. Distance within `max_distance_km` (inclusive)
/// 3. Budget bracket overlap
///
/// Stateless and cheap to clone; evaluations are independent of each other.
#[derive(Debug, Clone)]
pub struct Matcher {
    max_distance_km: f64,
}

impl Matcher {
    pub fn new(max_distance_km: f64) -> Self {
        Self { max_distance_km }
    }

    pub fn max_distance_km(&self) -> f64 {
        self.max_distance_km
    }

    /// Evaluate a single (request, listing) pair
    ///
    /// Malformed or missing fields fail the affected check instead of
    /// erroring, so the overall verdict is simply `false`.
    pub fn evaluate(&self, request: &PropertyRequest, listing: &Listing) -> MatchVerdict {
        let property_type_match = match (&request.property_type, &listing.property_type) {
            (Some(wanted), Some(offered)) => wanted == offered,
            _ => false,
        };

        let distance = distance_between(&request.coordinates, &listing.coordinates);
        let distance_match = distance.is_finite() && distance <= self.max_distance_km;

        let budget = check_budget_overlap(&request.budget, &listing.budget());

        let verdict = MatchVerdict {
            is_match: property_type_match && distance_match && budget.overlaps,
            property_type_match,
            distance_match,
            budget_match: budget.overlaps,
            distance_km: distance.is_finite().then_some(distance),
            request_budget: budget.first,
            listing_budget: budget.second,
        };

        tracing::debug!(
            "Evaluated request {:?} / listing {:?}: type={} distance={} ({:?} km) budget={} -> {}",
            request.id,
            listing.id,
            verdict.property_type_match,
            verdict.distance_match,
            verdict.distance_km,
            verdict.budget_match,
            verdict.is_match
        );

        verdict
    }

    /// Requests that should hear about a newly posted listing
    pub fn matches_for_listing(
        &self,
        listing: &Listing,
        candidates: Vec<PropertyRequest>,
    ) -> Vec<MatchedRequest> {
        let total = candidates.len();

        let matched: Vec<MatchedRequest> = candidates
            .into_iter()
            // Cheap geographic pre-filter before the full evaluation
            .filter(|request| self.may_be_near(listing, request))
            .filter_map(|request| {
                let verdict = self.evaluate(&request, listing);
                verdict.is_match.then_some(MatchedRequest { request, verdict })
            })
            .collect();

        tracing::debug!(
            "Listing {:?} matched {} of {} requests",
            listing.id,
            matched.len(),
            total
        );

        matched
    }

    /// Listings that should be announced to the owner of a new request
    pub fn matches_for_request(
        &self,
        request: &PropertyRequest,
        candidates: Vec<Listing>,
    ) -> Vec<MatchedListing> {
        let total = candidates.len();

        let matched: Vec<MatchedListing> = candidates
            .into_iter()
            .filter(|listing| self.may_be_near(listing, request))
            .filter_map(|listing| {
                let verdict = self.evaluate(request, &listing);
                verdict.is_match.then_some(MatchedListing { listing, verdict })
            })
            .collect();

        tracing::debug!(
            "Request {:?} matched {} of {} listings",
            request.id,
            matched.len(),
            total
        );

        matched
    }

    /// Bounding-box check; pairs without usable coordinates are rejected
    fn may_be_near(&self, listing: &Listing, request: &PropertyRequest) -> bool {
        let (Some(lat), Some(lng)) = (listing.coordinates.lat(), listing.coordinates.lng()) else {
            return false;
        };
        let (Some(req_lat), Some(req_lng)) = (request.coordinates.lat(), request.coordinates.lng())
        else {
            return false;
        };

        // Pad slightly so rounding at the box edge never rejects a pair
        // that haversine would accept.
        let bbox = calculate_bounding_box(lat, lng, self.max_distance_km * 1.01);
        is_within_bounding_box(req_lat, req_lng, &bbox)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DISTANCE_KM)
    }
}
