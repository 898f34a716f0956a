// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BoundingBox, Listing, MatchVerdict, MatchedListing, MatchedRequest, Notification,
    NotificationReport, NotificationStatus, PropertyRequest, RawListing, RawPropertyRequest,
};
pub use requests::{CheckMatchRequest, ListingEventRequest, PropertyRequestEvent};
pub use responses::{CheckMatchResponse, ErrorResponse, HealthResponse};
