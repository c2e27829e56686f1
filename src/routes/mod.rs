// Route exports
pub mod matches;

pub use matches::{AppState, MatchingContext};

use actix_web::web;

/// Mount every versioned endpoint under `/api/v1`
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1").configure(matches::configure));
}
