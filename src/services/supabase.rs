use crate::models::{Listing, PropertyRequest};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when reading from Supabase
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table names in Supabase
#[derive(Debug, Clone)]
pub struct SupabaseTables {
    pub listings: String,
    pub property_requests: String,
}

impl Default for SupabaseTables {
    fn default() -> Self {
        Self {
            listings: "listing".to_string(),
            property_requests: "property_requests".to_string(),
        }
    }
}

/// Read-only Supabase REST client used as the candidate source
///
/// Rows are decoded leniently: a row that fails to decode is skipped and
/// logged, never failing the whole fetch.
pub struct SupabaseClient {
    base_url: String,
    api_key: String,
    client: Client,
    tables: SupabaseTables,
}

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(base_url: String, api_key: String, tables: SupabaseTables) -> Result<Self, SupabaseError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
            tables,
        })
    }

    /// Fetch open property requests
    pub async fn fetch_property_requests(&self, limit: usize) -> Result<Vec<PropertyRequest>, SupabaseError> {
        self.fetch_rows(&self.tables.property_requests, limit).await
    }

    /// Fetch published listings
    pub async fn fetch_listings(&self, limit: usize) -> Result<Vec<Listing>, SupabaseError> {
        self.fetch_rows(&self.tables.listings, limit).await
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, table: &str, limit: usize) -> Result<Vec<T>, SupabaseError> {
        let url = format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table);

        tracing::debug!("Fetching up to {} rows from: {}", limit, url);

        let limit = limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("select", "*"), ("limit", limit.as_str())])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SupabaseError::Unauthorized);
        }
        if !status.is_success() {
            return Err(SupabaseError::ApiError(format!(
                "Failed to fetch {}: {}",
                table, status
            )));
        }

        let json: Value = response.json().await?;
        let rows = json
            .as_array()
            .ok_or_else(|| SupabaseError::InvalidResponse(format!("Expected an array of {} rows", table)))?;

        let decoded: Vec<T> = rows
            .iter()
            .filter_map(|row| match serde_json::from_value::<T>(row.clone()) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping undecodable {} row: {}", table, e);
                    None
                }
            })
            .collect();

        tracing::debug!("Fetched {} rows from {}", decoded.len(), table);

        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Coordinates;

    #[tokio::test]
    async fn test_fetch_property_requests() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/property_requests")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("select".into(), "*".into()),
                mockito::Matcher::UrlEncoded("limit".into(), "10".into()),
            ]))
            .match_header("apikey", "anon-key")
            .match_header("authorization", "Bearer anon-key")
            .with_status(200)
            .with_body(
                r#"[
                    {"id": 1, "property_type": "House", "coordinates": "{\"lat\":27.7,\"lng\":85.3}", "budget": "Under 50 Lakh", "phone": "9801234567"},
                    {"id": 2, "propertyType": "Room", "coordinates": "27.6,85.2", "budget": 15000}
                ]"#,
            )
            .create_async()
            .await;

        let client = SupabaseClient::new(server.url(), "anon-key".to_string(), SupabaseTables::default()).unwrap();
        let requests = client.fetch_property_requests(10).await.unwrap();

        mock.assert_async().await;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].property_type.as_deref(), Some("House"));
        assert_eq!(requests[0].coordinates, Coordinates::new(27.7, 85.3));
        assert_eq!(requests[1].id.as_deref(), Some("2"));
        assert_eq!(requests[1].coordinates, Coordinates::new(27.6, 85.2));
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/listing")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let client = SupabaseClient::new(server.url(), "bad".to_string(), SupabaseTables::default()).unwrap();
        let result = client.fetch_listings(10).await;

        assert!(matches!(result, Err(SupabaseError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_non_array_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/listing")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"message":"oops"}"#)
            .create_async()
            .await;

        let client = SupabaseClient::new(server.url(), "anon-key".to_string(), SupabaseTables::default()).unwrap();
        let result = client.fetch_listings(10).await;

        assert!(matches!(result, Err(SupabaseError::InvalidResponse(_))));
    }
}
