// ==============================================================================
// main.rs - SNP Risk Web Entry Point
// ==============================================================================
// Description: Axum web server for interactive SNP risk evaluation
// Author: Matt Barham
// Created: 2025-11-06
// Modified: 2026-01-17
// Version: 2.0.0
// ==============================================================================

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod handlers;
mod models;
mod render;
mod state;

use state::AppState;

const DEFAULT_PORT: u16 = 8099;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "snp_risk_web=info,snp_risk_predictor=info,tower_http=info".into());

    // LOG_FORMAT=json for log shippers, compact text otherwise
    if std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting SNP Risk Web v{}", env!("CARGO_PKG_VERSION"));

    let server_port = match std::env::var("SERVER_PORT") {
        Ok(raw) => raw
            .trim()
            .parse::<u16>()
            .with_context(|| format!("SERVER_PORT must be a port number, got '{}'", raw))?,
        Err(_) => DEFAULT_PORT,
    };

    // Dataset and model are required; refuse to serve without them
    let state = AppState::new().context("Failed to initialize application state")?;
    info!(
        "Loaded {} samples, model {}",
        state.context().dataset().len(),
        state.context().model_name()
    );

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/", get(handlers::api_info))
        .route("/samples", get(handlers::list_samples))
        .route("/samples/{index}", get(handlers::evaluate_sample));

    // Origins via CORS_ALLOWED_ORIGINS (comma-separated)
    let cors_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());
    let allowed_origins: Vec<_> = cors_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_credentials(false)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(handlers::page))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
