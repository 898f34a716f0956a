// Core algorithm exports
pub mod budget;
pub mod coordinates;
pub mod distance;
pub mod matcher;
pub mod message;

pub use budget::{budgets_overlap, check_budget_overlap, classify_budget, BudgetCheck, BudgetInput, BudgetRange};
pub use coordinates::{parse_coordinates, Coordinates};
pub use distance::{calculate_bounding_box, distance_between, haversine_distance, is_within_bounding_box, longitude_delta};
pub use matcher::{Matcher, DEFAULT_MAX_DISTANCE_KM};
pub use message::{listing_alert_for_requester, request_alert_for_owner};
