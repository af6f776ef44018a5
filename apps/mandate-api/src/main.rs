//! Mandate API server
//!
//! Mandate PDFs are produced client-side. This server exposes a health check
//! and answers the PDF endpoint with 501 so older clients get a clear
//! message instead of a missing route.

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod handlers;

const DEFAULT_PORT: u16 = 3002;

fn router() -> Router {
    // CORS configuration for web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/mandates/pdf", post(handlers::generate_pdf))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn port_from_env() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mandate_api=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let addr = SocketAddr::from(([0, 0, 0, 0], port_from_env()));
    info!("Starting mandate API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router()).await?;

    Ok(())
}
