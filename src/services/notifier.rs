use std::sync::Arc;
use thiserror::Error;

use crate::core::{listing_alert_for_requester, request_alert_for_owner, Matcher};
use crate::models::{Listing, MatchVerdict, Notification, NotificationReport, NotificationStatus, PropertyRequest};
use crate::services::{NotificationLedger, SmsClient, SupabaseClient, SupabaseError};

/// Errors that abort a notification run
///
/// Per-recipient delivery failures are reported inside the
/// [`NotificationReport`] instead.
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("Candidate source error: {0}")]
    Source(#[from] SupabaseError),

    #[error("No candidates supplied and no candidate source configured")]
    NoCandidateSource,
}

/// One alert waiting to be dispatched
struct Outgoing {
    request_id: Option<String>,
    listing_id: Option<String>,
    recipient: Option<String>,
    message: String,
    verdict: MatchVerdict,
}

/// Turns "a record was posted" into SMS alerts for its matching counterparts
#[derive(Clone)]
pub struct Notifier {
    matcher: Matcher,
    source: Option<Arc<SupabaseClient>>,
    sms: Arc<SmsClient>,
    ledger: NotificationLedger,
    max_candidates: usize,
}

impl Notifier {
    pub fn new(
        matcher: Matcher,
        source: Option<Arc<SupabaseClient>>,
        sms: Arc<SmsClient>,
        ledger: NotificationLedger,
        max_candidates: usize,
    ) -> Self {
        Self {
            matcher,
            source,
            sms,
            ledger,
            max_candidates,
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Alert everyone whose request is satisfied by a new listing
    pub async fn notify_for_listing(
        &self,
        listing: &Listing,
        candidates: Option<Vec<PropertyRequest>>,
        dry_run: bool,
    ) -> Result<NotificationReport, NotifierError> {
        let candidates = match candidates {
            Some(candidates) => candidates,
            None => {
                let source = self.source.as_ref().ok_or(NotifierError::NoCandidateSource)?;
                source.fetch_property_requests(self.max_candidates).await?
            }
        };
        let evaluated = candidates.len();

        let message = listing_alert_for_requester(listing);
        let outgoing: Vec<Outgoing> = self
            .matcher
            .matches_for_listing(listing, candidates)
            .into_iter()
            .map(|matched| Outgoing {
                request_id: matched.request.id,
                listing_id: listing.id.clone(),
                recipient: matched.request.phone,
                message: message.clone(),
                verdict: matched.verdict,
            })
            .collect();

        tracing::info!(
            "Listing {:?}: {} of {} requests matched",
            listing.id,
            outgoing.len(),
            evaluated
        );

        Ok(self.dispatch(evaluated, outgoing, dry_run).await)
    }

    /// Alert the owners of listings that satisfy a new request
    pub async fn notify_for_request(
        &self,
        request: &PropertyRequest,
        candidates: Option<Vec<Listing>>,
        dry_run: bool,
    ) -> Result<NotificationReport, NotifierError> {
        let candidates = match candidates {
            Some(candidates) => candidates,
            None => {
                let source = self.source.as_ref().ok_or(NotifierError::NoCandidateSource)?;
                source.fetch_listings(self.max_candidates).await?
            }
        };
        let evaluated = candidates.len();

        let message = request_alert_for_owner(request);
        let outgoing: Vec<Outgoing> = self
            .matcher
            .matches_for_request(request, candidates)
            .into_iter()
            .map(|matched| Outgoing {
                request_id: request.id.clone(),
                listing_id: matched.listing.id,
                recipient: matched.listing.created_by,
                message: message.clone(),
                verdict: matched.verdict,
            })
            .collect();

        tracing::info!(
            "Request {:?}: {} of {} listings matched",
            request.id,
            outgoing.len(),
            evaluated
        );

        Ok(self.dispatch(evaluated, outgoing, dry_run).await)
    }

    /// Send each alert in turn; one failure never stops the rest
    async fn dispatch(&self, evaluated: usize, outgoing: Vec<Outgoing>, dry_run: bool) -> NotificationReport {
        let matched = outgoing.len();
        let mut notifications = Vec::with_capacity(matched);

        for alert in outgoing {
            let (status, detail) = self.deliver(&alert, dry_run).await;

            notifications.push(Notification {
                id: uuid::Uuid::new_v4().to_string(),
                request_id: alert.request_id,
                listing_id: alert.listing_id,
                recipient: alert.recipient,
                message: alert.message,
                status,
                detail,
                distance_km: alert.verdict.distance_km,
            });
        }

        let report = NotificationReport {
            evaluated,
            matched,
            notifications,
        };

        tracing::info!(
            "Notification run: {} evaluated, {} matched, {} sent, {} failed",
            report.evaluated,
            report.matched,
            report.count(NotificationStatus::Sent),
            report.count(NotificationStatus::Failed)
        );

        report
    }

    async fn deliver(&self, alert: &Outgoing, dry_run: bool) -> (NotificationStatus, Option<String>) {
        let Some(recipient) = alert.recipient.as_deref() else {
            tracing::debug!(
                "No contact number for request {:?} / listing {:?}",
                alert.request_id,
                alert.listing_id
            );
            return (NotificationStatus::NoRecipient, None);
        };

        if dry_run || !self.sms.is_enabled() {
            return (NotificationStatus::DryRun, None);
        }

        let key = NotificationLedger::key(
            alert.request_id.as_deref(),
            alert.listing_id.as_deref(),
            recipient,
        );

        if let Some(key) = key.as_deref() {
            if !self.ledger.claim(key).await {
                tracing::debug!("Already notified {} for {}", recipient, key);
                return (NotificationStatus::Duplicate, None);
            }
        }

        match self.sms.send(recipient, &alert.message).await {
            Ok(receipt) => (NotificationStatus::Sent, receipt.gateway_response),
            Err(e) => {
                tracing::warn!("Failed to notify {}: {}", recipient, e);
                if let Some(key) = key.as_deref() {
                    self.ledger.release(key).await;
                }
                (NotificationStatus::Failed, Some(e.to_string()))
            }
        }
    }
}
