//! Property Match - listing/request matching and SMS alerts
//!
//! Decides whether a property request and a listing are compatible on
//! property type, distance and budget, and turns matches into SMS alerts
//! for the other party.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{Matcher, BudgetInput, BudgetRange, Coordinates, haversine_distance};
pub use self::models::{Listing, PropertyRequest, MatchVerdict, Notification, NotificationReport, NotificationStatus};
