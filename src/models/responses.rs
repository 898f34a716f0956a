use serde::{Deserialize, Serialize};
use crate::models::domain::MatchVerdict;

/// Response for the single-pair match check
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckMatchResponse {
    pub verdict: MatchVerdict,
    /// Text the listing owner would receive
    pub owner_message: String,
    /// Text the requester would receive
    pub requester_message: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
