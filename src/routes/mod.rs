// Route exports
pub mod errors;
pub mod notifications;

use actix_web::web;

pub use errors::{handle_json_payload_error, JsonError};
pub use notifications::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(notifications::configure),
    );
}
