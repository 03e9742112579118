//! Data models for battery-enrich

pub mod battery;

pub use battery::{
    BatteryRecord, EnrichItem, EnrichRequest, EnrichResponse, EnrichResult, ExportRequest,
};
