//! Canonical battery record and enrichment request/response types
//!
//! `BatteryRecord` is the fixed-schema entity this service produces. `mpn` is
//! the only required field; everything else is independently nullable and is
//! never fabricated when a source does not supply it.

use serde::{Deserialize, Serialize};

/// Canonical battery record, keyed by manufacturer part number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryRecord {
    /// Manufacturer part number (primary key, always non-empty once cached or exported)
    pub mpn: String,
    /// Manufacturer name (may be an empty string when unknown)
    pub manufacturer: Option<String>,
    /// Marketing title
    pub title: Option<String>,
    /// Short human-readable description (generated)
    pub overview: Option<String>,
    /// Battery chemistry (e.g., "Lithium", "Alkaline")
    pub chemistry: Option<String>,
    /// Nominal voltage in volts
    pub voltage_v: Option<f64>,
    /// Capacity as supplied (free text, e.g., "220mAh")
    pub capacity: Option<String>,
    /// Energy in watt-hours
    pub wh: Option<f64>,
    /// Form factor (e.g., "Coin Cell", "Cylindrical")
    pub form_factor: Option<String>,
    /// Physical dimensions (free text)
    pub dimensions: Option<String>,
    /// Terminal style (e.g., "Button Top")
    pub termination: Option<String>,
    /// Tri-state: true / false / unknown
    pub rechargeable: Option<bool>,
    /// Operating temperature range (free text)
    pub operating_temp: Option<String>,
    /// Weight as supplied (free text)
    pub weight: Option<String>,
    /// Datasheet URL
    pub datasheet_url: Option<String>,
    /// Source URLs this record was assembled from
    #[serde(default)]
    pub source_urls: Vec<String>,
    /// Warnings accumulated during processing
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl BatteryRecord {
    /// Record with only the part number set
    pub fn new(mpn: impl Into<String>) -> Self {
        Self {
            mpn: mpn.into(),
            manufacturer: None,
            title: None,
            overview: None,
            chemistry: None,
            voltage_v: None,
            capacity: None,
            wh: None,
            form_factor: None,
            dimensions: None,
            termination: None,
            rechargeable: None,
            operating_temp: None,
            weight: None,
            datasheet_url: None,
            source_urls: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Degraded record returned when enrichment fails for an item
    pub fn minimal(
        mpn: impl Into<String>,
        manufacturer: impl Into<String>,
        warnings: Vec<String>,
    ) -> Self {
        let mut record = Self::new(mpn);
        record.manufacturer = Some(manufacturer.into());
        record.warnings = warnings;
        record
    }
}

/// One item of an enrichment batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichItem {
    pub mpn: String,
    /// Manufacturer hint; may be empty
    #[serde(default)]
    pub manufacturer: String,
}

/// POST /enrich request body
#[derive(Debug, Deserialize)]
pub struct EnrichRequest {
    pub items: Vec<EnrichItem>,
}

/// Per-item enrichment outcome
#[derive(Debug, Serialize)]
pub struct EnrichResult {
    pub record: BatteryRecord,
    /// "success" | "error"
    pub status: String,
    pub error: Option<String>,
}

/// POST /enrich response body; one result per input item, same order
#[derive(Debug, Serialize)]
pub struct EnrichResponse {
    pub results: Vec<EnrichResult>,
}

/// POST /export request body
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub records: Vec<BatteryRecord>,
    /// "xlsx" | "csv"
    pub format: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_has_only_mpn() {
        let record = BatteryRecord::new("CR2032");
        assert_eq!(record.mpn, "CR2032");
        assert!(record.manufacturer.is_none());
        assert!(record.chemistry.is_none());
        assert!(record.voltage_v.is_none());
        assert!(record.rechargeable.is_none());
        assert!(record.source_urls.is_empty());
        assert!(record.warnings.is_empty());
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let mut record = BatteryRecord::new("18650");
        record.voltage_v = Some(3.7);
        record.rechargeable = Some(true);
        record.source_urls = vec!["https://example.com/18650".to_string()];

        let json = serde_json::to_string(&record).unwrap();
        let parsed: BatteryRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_enrich_item_manufacturer_defaults_empty() {
        let item: EnrichItem = serde_json::from_str(r#"{"mpn": "AA"}"#).unwrap();
        assert_eq!(item.manufacturer, "");
    }
}
