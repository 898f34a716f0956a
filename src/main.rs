use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use property_match::config::Settings;
use property_match::core::Matcher;
use property_match::routes::{self, handle_json_payload_error, AppState};
use property_match::services::{NotificationLedger, Notifier, SmsClient, SupabaseClient, SupabaseTables};
use std::sync::Arc;
use tracing::{info, warn, error};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    // RUST_LOG wins so matcher diagnostics can be enabled per module,
    // e.g. RUST_LOG=property_match::core=trace
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    init_logging();

    info!("Starting property match service...");

    let settings = Settings::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    info!("Configuration loaded successfully");

    // Candidate source (optional - callers can send candidates inline)
    let source = match &settings.supabase {
        Some(supabase) => {
            let tables = SupabaseTables {
                listings: supabase.listings_table.clone(),
                property_requests: supabase.property_requests_table.clone(),
            };
            let client = SupabaseClient::new(supabase.url.clone(), supabase.api_key.clone(), tables)
                .map_err(|e| {
                    error!("Failed to create Supabase client: {}", e);
                    std::io::Error::new(std::io::ErrorKind::Other, e)
                })?;
            info!("Supabase candidate source initialized ({})", supabase.url);
            Some(Arc::new(client))
        }
        None => {
            warn!("No Supabase section configured, candidates must be sent inline");
            None
        }
    };

    let sms = SmsClient::new(
        settings.sms.endpoint.clone(),
        settings.sms.token.clone(),
        settings.sms.sender.clone(),
        settings.sms.enabled,
    )
    .map_err(|e| {
        error!("Failed to create SMS client: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    if sms.is_enabled() {
        info!("SMS delivery enabled via {}", settings.sms.endpoint);
    } else {
        warn!("SMS delivery disabled, alerts will be logged only");
    }

    let ledger = NotificationLedger::new(
        settings.notifications.dedupe_capacity,
        settings.notifications.dedupe_ttl_secs,
    );

    let matcher = Matcher::new(settings.matching.max_distance_km);

    info!("Matcher initialized (max distance: {} km)", matcher.max_distance_km());

    let app_state = AppState {
        notifier: Notifier::new(
            matcher,
            source,
            Arc::new(sms),
            ledger,
            settings.matching.max_candidates,
        ),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(
                web::JsonConfig::default()
                    .limit(4 * 1024 * 1024)
                    .error_handler(handle_json_payload_error),
            )
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
