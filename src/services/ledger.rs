use moka::future::Cache;
use std::time::Duration;

/// Remembers recently sent alerts so a re-posted or re-saved record does not
/// text the same person twice about the same pair.
///
/// In-memory only; a restart forgets everything.
#[derive(Clone)]
pub struct NotificationLedger {
    sent: Cache<String, ()>,
}

impl NotificationLedger {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let sent = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { sent }
    }

    /// Key for a (request, listing, recipient) triple; `None` without both ids
    pub fn key(request_id: Option<&str>, listing_id: Option<&str>, recipient: &str) -> Option<String> {
        match (request_id, listing_id) {
            (Some(request_id), Some(listing_id)) => {
                Some(format!("notified:{}:{}:{}", request_id, listing_id, recipient))
            }
            _ => None,
        }
    }

    /// Claim `key` for sending; returns `false` if it was already claimed
    pub async fn claim(&self, key: &str) -> bool {
        let entry = self.sent.entry(key.to_string()).or_insert(()).await;
        let fresh = entry.is_fresh();
        if !fresh {
            tracing::trace!("Ledger hit: {}", key);
        }
        fresh
    }

    /// Forget a claim, e.g. after the send failed
    pub async fn release(&self, key: &str) {
        self.sent.invalidate(key).await;
    }
}
