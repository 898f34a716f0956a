use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::{listing_alert_for_requester, request_alert_for_owner};
use crate::models::{
    CheckMatchRequest, CheckMatchResponse, ErrorResponse, HealthResponse, ListingEventRequest,
    PropertyRequestEvent,
};
use crate::services::{Notifier, NotifierError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub notifier: Notifier,
}

/// Configure all notification-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/check", web::post().to(check_match))
        .route("/notifications/listing", web::post().to(notify_listing))
        .route("/notifications/request", web::post().to(notify_request));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Explain how one request/listing pair is judged
///
/// POST /api/v1/matches/check
///
/// Request body:
/// ```json
/// {
///   "request": { "propertyType": "House", "coordinates": {"lat": 27.7, "lng": 85.3}, "budget": "Under 50 Lakh" },
///   "listing": { "property_type": "House", "coordinates": "27.7,85.3", "price": 4000000 }
/// }
/// ```
async fn check_match(
    state: web::Data<AppState>,
    req: web::Json<CheckMatchRequest>,
) -> impl Responder {
    let CheckMatchRequest { request, listing } = req.into_inner();

    let verdict = state.notifier.matcher().evaluate(&request, &listing);

    tracing::info!(
        "Match check request {:?} / listing {:?}: {}",
        request.id,
        listing.id,
        verdict.is_match
    );

    HttpResponse::Ok().json(CheckMatchResponse {
        verdict,
        owner_message: request_alert_for_owner(&request),
        requester_message: listing_alert_for_requester(&listing),
    })
}

/// A listing was posted
///
/// POST /api/v1/notifications/listing
///
/// Request body:
/// ```json
/// {
///   "listing": { ... },
///   "candidates": [ { ...property request... } ],
///   "dryRun": false
/// }
/// ```
async fn notify_listing(
    state: web::Data<AppState>,
    req: web::Json<ListingEventRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let ListingEventRequest { listing, candidates, dry_run } = req.into_inner();

    tracing::info!(
        "Listing event {:?} ({} inline candidates, dry run: {})",
        listing.id,
        candidates.as_ref().map_or(0, Vec::len),
        dry_run
    );

    match state.notifier.notify_for_listing(&listing, candidates, dry_run).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => notifier_failed(e),
    }
}

/// A property request was posted
///
/// POST /api/v1/notifications/request
async fn notify_request(
    state: web::Data<AppState>,
    req: web::Json<PropertyRequestEvent>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let PropertyRequestEvent { request, candidates, dry_run } = req.into_inner();

    tracing::info!(
        "Request event {:?} ({} inline candidates, dry run: {})",
        request.id,
        candidates.as_ref().map_or(0, Vec::len),
        dry_run
    );

    match state.notifier.notify_for_request(&request, candidates, dry_run).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => notifier_failed(e),
    }
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    tracing::info!("Validation failed: {}", errors);
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn notifier_failed(e: NotifierError) -> HttpResponse {
    match e {
        NotifierError::NoCandidateSource => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Missing candidates".to_string(),
            message: e.to_string(),
            status_code: 400,
        }),
        NotifierError::Source(_) => {
            tracing::error!("Failed to load candidates: {}", e);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "Failed to load candidates".to_string(),
                message: e.to_string(),
                status_code: 502,
            })
        }
    }
}
