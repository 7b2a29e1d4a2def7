//! medsupply-server library crate
//!
//! Exposes `build_app` and `config` for integration tests.
//! The actual binary entrypoint is in `main.rs`.

pub mod ai;
pub mod config;
mod error;
mod http;
mod middleware;
pub mod resolver;
mod routes;
pub mod search;
pub mod weather;

use std::sync::Arc;

use axum::{Extension, Router, middleware as axum_mw, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use resolver::{HealthInsightResolver, HospitalResolver, Providers};
use weather::WeatherClient;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub hospitals: Arc<HospitalResolver>,
    pub insights: Arc<HealthInsightResolver>,
    pub weather: Arc<WeatherClient>,
}

impl AppState {
    /// Wire the real upstream clients from configuration.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = http::upstream_client(config)?;
        let providers = Providers::from_config(config, client.clone());
        Ok(Self::new(&providers, WeatherClient::new(config, client)))
    }

    pub fn new(providers: &Providers, weather: WeatherClient) -> Self {
        Self {
            hospitals: Arc::new(HospitalResolver::new(providers)),
            insights: Arc::new(HealthInsightResolver::new(providers)),
            weather: Arc::new(weather),
        }
    }
}

/// Build the full application router with all routes and middleware.
///
/// Extracted from `main()` so integration tests can construct the app
/// without binding to a TCP port.
pub fn build_app(config: &Config) -> Result<Router, reqwest::Error> {
    Ok(build_app_with_state(AppState::from_config(config)?, config))
}

/// Same as [`build_app`], with caller-supplied state.
pub fn build_app_with_state(state: AppState, config: &Config) -> Router {
    // Install Prometheus metrics recorder.
    // Use build_recorder() + set_global_recorder() so that repeated calls
    // (e.g. in integration tests) don't panic; the second install is
    // silently ignored and we still get a valid handle for /metrics.
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let prometheus_handle = recorder.handle();
    let _ = metrics::set_global_recorder(recorder);

    // Operational routes
    let public_routes = Router::new()
        .route("/", get(routes::root::get))
        .route("/health", get(routes::health::check))
        .route("/metrics", get(routes::metrics::get))
        .layer(Extension(prometheus_handle));

    // Build CORS layer
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Build application
    Router::new()
        .merge(public_routes)
        .nest("/api", routes::api_routes())
        .fallback(routes::not_found::handler)
        .with_state(state)
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(middleware::metrics_middleware))
}
