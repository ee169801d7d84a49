//! erwait-server: ER wait-time prediction HTTP server binary entrypoint.

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use erwait_server::config::Config;
use erwait_server::AppState;

#[tokio::main]
async fn main() {
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
    if config.anthropic_api_key.is_some() {
        tracing::info!("Anthropic API key configured, AI predictions enabled");
    } else {
        tracing::warn!("ANTHROPIC_API_KEY not set, using heuristic predictions");
    }
    if config.places_api_key.is_some() {
        tracing::info!("Places API key configured, live hospital search enabled");
    } else {
        tracing::warn!("GOOGLE_PLACES_API_KEY not set, using seeded hospital data");
    }
    if config.weather_api_key.is_none() {
        tracing::info!("WEATHER_API_KEY not set, using keyless weather data");
    }
    if config.traffic_api_key.is_none() {
        tracing::info!("TRAFFIC_API_KEY not set, using neutral traffic data");
    }
    tracing::info!("Rate limiting: {} requests/second", config.rate_limit_rps);

    // Build application
    let state = AppState::new(&config);
    let app = erwait_server::build_app(state.clone(), &config);

    // Start the background prediction refresh loop
    erwait_server::refresh::spawn(state, &config);
    tracing::info!(
        "Prediction refresh every {} seconds",
        config.update_interval_secs
    );

    // Start server
    let addr: SocketAddr = config.bind_address.parse().expect("Invalid bind address");
    tracing::info!("Starting ER wait server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

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
