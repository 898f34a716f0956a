use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::budget::{BudgetInput, BudgetRange};
use crate::core::coordinates::{parse_coordinates, Coordinates};

/// Property request row exactly as storage returns it
///
/// Upstream writes some columns under two spellings, so both are accepted
/// here and merged into [`PropertyRequest`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPropertyRequest {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(rename = "propertyType", default)]
    pub property_type_camel: Option<Value>,
    #[serde(rename = "property_type", default)]
    pub property_type_snake: Option<Value>,
    #[serde(default)]
    pub coordinates: Option<Value>,
    #[serde(default)]
    pub budget: Option<Value>,
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(default)]
    pub location: Option<Value>,
}

/// Someone looking for a property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPropertyRequest", rename_all = "camelCase")]
pub struct PropertyRequest {
    pub id: Option<String>,
    pub property_type: Option<String>,
    pub coordinates: Coordinates,
    pub budget: BudgetInput,
    pub phone: Option<String>,
    pub location: Option<String>,
}

impl From<RawPropertyRequest> for PropertyRequest {
    fn from(raw: RawPropertyRequest) -> Self {
        Self {
            id: text(raw.id),
            property_type: text(raw.property_type_camel).or_else(|| text(raw.property_type_snake)),
            coordinates: raw
                .coordinates
                .map(|v| parse_coordinates(&v))
                .unwrap_or_default(),
            budget: raw
                .budget
                .map(|v| BudgetInput::from_value(&v))
                .unwrap_or_default(),
            phone: text(raw.phone),
            location: text(raw.location),
        }
    }
}

/// Listing row exactly as storage returns it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawListing {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(rename = "propertyType", default)]
    pub property_type_camel: Option<Value>,
    #[serde(rename = "property_type", default)]
    pub property_type_snake: Option<Value>,
    #[serde(default)]
    pub coordinates: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(rename = "priceRange", default)]
    pub price_range_camel: Option<Value>,
    #[serde(rename = "price_range", default)]
    pub price_range_snake: Option<Value>,
    #[serde(default)]
    pub address: Option<Value>,
    #[serde(rename = "createdBy", default)]
    pub created_by_camel: Option<Value>,
    #[serde(rename = "created_by", default)]
    pub created_by_snake: Option<Value>,
}

/// A property offered for sale or rent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawListing", rename_all = "camelCase")]
pub struct Listing {
    pub id: Option<String>,
    pub title: Option<String>,
    pub property_type: Option<String>,
    pub coordinates: Coordinates,
    pub price: Option<f64>,
    pub price_range: Option<String>,
    pub address: Option<String>,
    /// Owner contact number
    pub created_by: Option<String>,
}

impl Listing {
    /// Budget used for matching: the range label wins over the raw price
    pub fn budget(&self) -> BudgetInput {
        match (&self.price_range, self.price) {
            (Some(label), _) => BudgetInput::Text(label.clone()),
            (None, Some(price)) => BudgetInput::Amount(price),
            (None, None) => BudgetInput::Missing,
        }
    }
}

impl From<RawListing> for Listing {
    fn from(raw: RawListing) -> Self {
        Self {
            id: text(raw.id),
            title: text(raw.title),
            property_type: text(raw.property_type_camel).or_else(|| text(raw.property_type_snake)),
            coordinates: raw
                .coordinates
                .map(|v| parse_coordinates(&v))
                .unwrap_or_default(),
            price: raw.price.as_ref().and_then(amount),
            price_range: text(raw.price_range_camel).or_else(|| text(raw.price_range_snake)),
            address: text(raw.address),
            created_by: text(raw.created_by_camel).or_else(|| text(raw.created_by_snake)),
        }
    }
}

/// Non-empty string or number rendered as text
fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn amount(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|p| p.is_finite())
}

/// Outcome of evaluating one (request, listing) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchVerdict {
    pub is_match: bool,
    pub property_type_match: bool,
    pub distance_match: bool,
    pub budget_match: bool,
    /// `None` when either location could not be parsed
    pub distance_km: Option<f64>,
    pub request_budget: Option<BudgetRange>,
    pub listing_budget: Option<BudgetRange>,
}

/// Request that matched a new listing
#[derive(Debug, Clone)]
pub struct MatchedRequest {
    pub request: PropertyRequest,
    pub verdict: MatchVerdict,
}

/// Listing that matched a new request
#[derive(Debug, Clone)]
pub struct MatchedListing {
    pub listing: Listing,
    pub verdict: MatchVerdict,
}

/// Delivery state of a single alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Sent,
    DryRun,
    Duplicate,
    Failed,
    NoRecipient,
}

/// Alert produced for a matched pair
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub request_id: Option<String>,
    pub listing_id: Option<String>,
    pub recipient: Option<String>,
    pub message: String,
    pub status: NotificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub distance_km: Option<f64>,
}

/// Summary of one notification run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationReport {
    pub evaluated: usize,
    pub matched: usize,
    pub notifications: Vec<Notification>,
}

impl NotificationReport {
    pub fn count(&self, status: NotificationStatus) -> usize {
        self.notifications.iter().filter(|n| n.status == status).count()
    }
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}
