use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when sending an SMS
#[derive(Debug, Error)]
pub enum SmsError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Gateway rejected message ({status}): {message}")]
    Gateway { status: u16, message: String },

    #[error("SMS gateway is not configured: {0}")]
    NotConfigured(String),
}

/// Result of a send attempt that did not error
#[derive(Debug, Clone, PartialEq)]
pub struct SmsReceipt {
    /// Normalised destination number
    pub to: String,
    /// `false` when the client is disabled and nothing left the process
    pub delivered: bool,
    pub gateway_response: Option<String>,
}

/// Normalise a Nepali mobile number to its ten-digit local form
///
/// Accepts separators (spaces, dashes, dots, parentheses), a leading `+`
/// and the `977` country code.
pub fn normalize_phone(raw: &str) -> Result<String, SmsError> {
    let digits: String = raw
        .trim()
        .trim_start_matches('+')
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(SmsError::InvalidPhone(raw.to_string()));
    }

    let local = match digits.strip_prefix("977") {
        Some(rest) if rest.len() == 10 => rest,
        _ => digits.as_str(),
    };

    if local.len() != 10 || !local.starts_with('9') {
        return Err(SmsError::InvalidPhone(raw.to_string()));
    }

    Ok(local.to_string())
}

/// Sparrow SMS HTTP API client
///
/// When disabled, messages are logged instead of sent so the rest of the
/// pipeline can run in development without credentials.
pub struct SmsClient {
    endpoint: String,
    token: String,
    sender: String,
    enabled: bool,
    client: Client,
}

impl SmsClient {
    /// Create a new SMS client
    pub fn new(
        endpoint: String,
        token: String,
        sender: String,
        enabled: bool,
    ) -> Result<Self, SmsError> {
        if enabled && token.trim().is_empty() {
            return Err(SmsError::NotConfigured("sms.token is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            endpoint,
            token,
            sender,
            enabled,
            client,
        })
    }

    /// Client that never touches the network
    pub fn disabled() -> Self {
        Self {
            endpoint: String::new(),
            token: String::new(),
            sender: String::new(),
            enabled: false,
            client: Client::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Send `text` to `to`
    ///
    /// The number is normalised first; invalid numbers fail before any
    /// request is made.
    pub async fn send(&self, to: &str, text: &str) -> Result<SmsReceipt, SmsError> {
        let to = normalize_phone(to)?;

        if !self.enabled {
            tracing::info!("SMS disabled, not sending to {}: {}", to, text);
            return Ok(SmsReceipt {
                to,
                delivered: false,
                gateway_response: None,
            });
        }

        tracing::debug!("Sending SMS to {} via {}", to, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[
                ("token", self.token.as_str()),
                ("from", self.sender.as_str()),
                ("to", to.as_str()),
                ("text", text),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = gateway_message(&body);

        if !status.is_success() {
            tracing::warn!("SMS gateway returned {} for {}: {}", status, to, message);
            return Err(SmsError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!("SMS queued for {}: {}", to, message);

        Ok(SmsReceipt {
            to,
            delivered: true,
            gateway_response: Some(message),
        })
    }
}

/// Human-readable part of a gateway reply, falling back to the raw body
fn gateway_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("response")
                .and_then(|r| r.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("9801234567").unwrap(), "9801234567");
        assert_eq!(normalize_phone("+977 980-123-4567").unwrap(), "9801234567");
        assert_eq!(normalize_phone("977-9801234567").unwrap(), "9801234567");
        assert_eq!(normalize_phone("(980) 1234567").unwrap(), "9801234567");
    }

    #[test]
    fn test_normalize_phone_rejects_garbage() {
        assert!(normalize_phone("").is_err());
        assert!(normalize_phone("01-4412345").is_err());
        assert!(normalize_phone("98012345").is_err());
        assert!(normalize_phone("98012345678").is_err());
        assert!(normalize_phone("98O1234567").is_err());
    }

    #[test]
    fn test_gateway_message() {
        assert_eq!(
            gateway_message(r#"{"count":1,"response_code":200,"response":"1 mesages has been queued."}"#),
            "1 mesages has been queued."
        );
        assert_eq!(gateway_message("Invalid Token"), "Invalid Token");
    }

    #[test]
    fn test_enabled_client_requires_token() {
        let result = SmsClient::new(
            "https://api.sparrowsms.com/v2/sms/".to_string(),
            " ".to_string(),
            "InfoSMS".to_string(),
            true,
        );
        assert!(matches!(result, Err(SmsError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_disabled_client_skips_network() {
        let client = SmsClient::disabled();
        let receipt = client.send("+9779801234567", "hello").await.unwrap();
        assert_eq!(receipt.to, "9801234567");
        assert!(!receipt.delivered);
    }

    #[tokio::test]
    async fn test_send_posts_form_to_gateway() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/sms/")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("token".into(), "secret".into()),
                mockito::Matcher::UrlEncoded("to".into(), "9801234567".into()),
                mockito::Matcher::UrlEncoded("text".into(), "New House listed".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"count":1,"response_code":200,"response":"1 mesages has been queued."}"#)
            .create_async()
            .await;

        let client = SmsClient::new(
            format!("{}/v2/sms/", server.url()),
            "secret".to_string(),
            "InfoSMS".to_string(),
            true,
        )
        .unwrap();

        let receipt = client.send("9801234567", "New House listed").await.unwrap();

        mock.assert_async().await;
        assert!(receipt.delivered);
        assert_eq!(receipt.gateway_response.as_deref(), Some("1 mesages has been queued."));
    }

    #[tokio::test]
    async fn test_gateway_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2/sms/")
            .with_status(403)
            .with_body(r#"{"response_code":1002,"response":"Invalid Token"}"#)
            .create_async()
            .await;

        let client = SmsClient::new(
            format!("{}/v2/sms/", server.url()),
            "wrong".to_string(),
            "InfoSMS".to_string(),
            true,
        )
        .unwrap();

        match client.send("9801234567", "hi").await {
            Err(SmsError::Gateway { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "Invalid Token");
            }
            other => panic!("expected gateway error, got {:?}", other),
        }
    }
}
