mod analysis;
mod config;
mod errors;
mod routes;
mod state;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
    install_panic_logging();

    info!("Starting ATS Scanner API v{}", env!("CARGO_PKG_VERSION"));
    info!("Upload limit: {} bytes", config.max_upload_bytes);

    let cors = build_cors(&config)?;
    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;

    let app = build_router(AppState { config })
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Parser panics are caught in the extractor; report them as one tracing event
/// instead of the default stderr message and backtrace.
fn install_panic_logging() {
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("panic: {info}");
    }));
}

/// Permissive unless `CORS_ALLOW_ORIGIN` pins a single origin.
fn build_cors(config: &Config) -> Result<CorsLayer> {
    let Some(origin) = &config.cors_allow_origin else {
        return Ok(CorsLayer::permissive());
    };

    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("CORS_ALLOW_ORIGIN '{origin}' is not a valid header value"))?;
    info!("CORS restricted to {origin:?}");

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any))
}
