//! HTTP API handlers for battery-enrich

pub mod enrich;
pub mod export;
pub mod health;
pub mod upload;

pub use enrich::enrich_routes;
pub use export::export_routes;
pub use health::health_routes;
pub use upload::upload_routes;
