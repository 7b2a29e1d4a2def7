pub mod health;
pub mod hospitals;
pub mod insights;
pub mod location;
pub mod metrics;
pub mod not_found;
pub mod root;

use axum::{Router, routing::get};

use crate::AppState;

/// Build the `/api` routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/hospitals/{state}", get(hospitals::list))
        .route("/insights", get(insights::get))
        .route("/location", get(location::get))
}
