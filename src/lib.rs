//! battery-enrich library interface
//!
//! Accepts spreadsheets of battery part numbers, enriches each with
//! normalized specification data plus a generated overview, caches the
//! results, and re-exports enriched records in a fixed tabular layout.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::Config;
use crate::services::Enricher;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Per-item enrichment pipeline
    pub enricher: Arc<Enricher>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(enricher: Enricher) -> Self {
        Self {
            enricher: Arc::new(enricher),
            startup_time: Utc::now(),
        }
    }

    /// Build the default state (static candidate source) from configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(Enricher::from_config(config)?))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::upload_routes())
        .merge(api::enrich_routes())
        .merge(api::export_routes())
        .with_state(state)
}
