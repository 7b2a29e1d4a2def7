//! medsupply-server: MedSupply data-enrichment API binary entrypoint.

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medsupply_server::config::Config;

#[tokio::main]
async fn main() {
    // Local env files take precedence over .env; real env vars win over both
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();

    // Log startup info
    if config.has_keyed_search() {
        tracing::info!("Google search credentials configured");
    } else {
        tracing::warn!("GOOGLE_SEARCH_API_KEY/GOOGLE_SEARCH_ENGINE_ID not set, keyed search disabled");
    }
    if config.credentials.gemini_api_key.is_some() {
        tracing::info!("Gemini API key configured");
    } else {
        tracing::warn!("GEMINI_API_KEY not set, primary LLM disabled");
    }
    if config.credentials.groq_api_key.is_some() {
        tracing::info!("Groq API key configured");
    } else {
        tracing::warn!("GROQ_API_KEY not set, fallback LLM disabled");
    }
    tracing::info!("Upstream timeout: {} seconds", config.upstream_timeout_secs);

    // Build application
    let app =
        medsupply_server::build_app(&config).expect("Failed to build upstream HTTP client");

    // Start server
    let addr: SocketAddr = config.bind_address.parse().expect("Invalid bind address");
    tracing::info!("Starting MedSupply server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server shutdown complete");
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
