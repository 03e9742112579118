//! battery-enrich - Battery Part Enrichment Service
//!
//! Accepts spreadsheet uploads of battery part numbers, enriches each record
//! through the lookup → normalize → overview → cache pipeline, and exports
//! enriched records as xlsx or csv.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use battery_enrich::config::Config;
use battery_enrich::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting battery-enrich service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    info!("Cache directory: {}", config.cache_dir.display());
    if config.gemini_api_key.is_some() {
        info!("Overview generation: Gemini (with template fallback)");
    } else {
        info!("Overview generation: template only (no API key configured)");
    }

    let state = AppState::from_config(&config)?;
    let app = battery_enrich::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.port)).await?;
    info!("Listening on http://127.0.0.1:{}", config.port);
    info!("Health check: http://127.0.0.1:{}/health", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
