//! Part-lookup provider
//!
//! `CandidateProvider` is the pluggable seam for part lookup: one synchronous
//! method returning an untyped field bag suitable for the normalizer. The
//! current implementation is a static table of recognized part numbers; a
//! networked provider can replace it behind the same trait, handling its own
//! timeouts and retries internally.

use serde_json::{json, Value};
use std::collections::HashMap;

/// Untyped field set returned by a lookup provider before normalization
pub type CandidateBag = HashMap<String, Value>;

/// Pluggable part-lookup provider
pub trait CandidateProvider: Send + Sync {
    /// Return known fields for the part number, or an empty bag if unrecognized
    fn fetch(&self, mpn: &str, manufacturer: &str) -> CandidateBag;
}

/// Static lookup table covering a fixed set of sample part numbers
pub struct StaticCandidateSource;

impl StaticCandidateSource {
    pub fn new() -> Self {
        Self
    }

    fn known_fields(mpn_upper: &str) -> Option<Value> {
        let fields = match mpn_upper {
            "CR2032" => json!({
                "title": "CR2032 3V Lithium Coin Cell Battery",
                "chemistry": "Lithium",
                "voltage_v": 3.0,
                "capacity": "220mAh",
                "form_factor": "Coin Cell",
                "dimensions": "20mm x 3.2mm",
                "rechargeable": false,
                "operating_temp": "-30°C to +60°C",
                "weight": "3.1g",
                "source_urls": ["https://example.com/cr2032"],
            }),
            "18650" => json!({
                "title": "18650 Lithium Ion Battery",
                "chemistry": "Lithium-Ion",
                "voltage_v": 3.7,
                "capacity": "2600mAh",
                "wh": 9.62,
                "form_factor": "Cylindrical",
                "dimensions": "18mm x 65mm",
                "termination": "Button Top",
                "rechargeable": true,
                "operating_temp": "0°C to +45°C",
                "weight": "45g",
                "source_urls": ["https://example.com/18650"],
            }),
            "AA" => json!({
                "title": "AA Alkaline Battery",
                "chemistry": "Alkaline",
                "voltage_v": 1.5,
                "capacity": "2500mAh",
                "form_factor": "AA",
                "dimensions": "14.5mm x 50.5mm",
                "rechargeable": false,
                "operating_temp": "-18°C to +55°C",
                "weight": "23g",
                "source_urls": ["https://example.com/aa"],
            }),
            _ => return None,
        };
        Some(fields)
    }
}

impl Default for StaticCandidateSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateProvider for StaticCandidateSource {
    fn fetch(&self, mpn: &str, manufacturer: &str) -> CandidateBag {
        let mpn_upper = mpn.to_uppercase();

        let mut bag: CandidateBag = match Self::known_fields(&mpn_upper) {
            Some(Value::Object(map)) => map.into_iter().collect(),
            _ => CandidateBag::new(),
        };

        if !manufacturer.is_empty() {
            bag.insert("manufacturer".to_string(), json!(manufacturer));
        }

        bag
    }
}
