//! PDF Processing Service - Entry point
//!
//! Text extraction and analysis service for PDF documents.

use pdf_processor::{run_server, ServiceConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_processor=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }
    let config = ServiceConfig::from_env();

    tracing::info!(
        "Starting PDF Processing Service v{}",
        env!("CARGO_PKG_VERSION")
    );

    run_server(config).await
}
