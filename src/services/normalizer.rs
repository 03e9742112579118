//! Field normalization
//!
//! Maps a loosely-typed candidate bag into the canonical `BatteryRecord`
//! schema. Parsing is defensive throughout: unparsable numeric or boolean
//! input becomes `None`, never an error.

use serde_json::Value;

use crate::models::BatteryRecord;
use crate::services::candidates::CandidateBag;

/// Case-insensitive alias table mapping raw candidate keys to canonical fields
///
/// Aliases never overwrite a field already populated by a direct lookup
/// (first-writer-wins).
fn canonical_alias(key: &str) -> Option<&'static str> {
    let alias = match key {
        "nominal voltage" | "voltage" | "voltage (v)" => "voltage_v",
        "capacity" | "capacity (mah)" | "capacity (ah)" => "capacity",
        "chemistry" | "battery type" | "type" => "chemistry",
        "size" | "form factor" => "form_factor",
        "dimensions" | "size dimensions" => "dimensions",
        "termination" => "termination",
        "rechargeable" => "rechargeable",
        "temp range" | "operating temp" | "operating temperature" => "operating_temp",
        "weight" => "weight",
        "datasheet" | "datasheet url" => "datasheet_url",
        _ => return None,
    };
    Some(alias)
}

/// Normalize a candidate bag into a canonical record
///
/// The returned record always carries `mpn` as given, independent of bag
/// content. An explicit `manufacturer` override wins over a bag-supplied one.
pub fn normalize_candidates(
    candidates: &CandidateBag,
    mpn: &str,
    manufacturer: &str,
) -> BatteryRecord {
    let mut record = BatteryRecord::new(mpn);

    let manufacturer = if !manufacturer.is_empty() {
        manufacturer.to_string()
    } else {
        string_value(candidates.get("manufacturer")).unwrap_or_default()
    };
    record.manufacturer = Some(manufacturer);

    // Direct key lookups; earlier keys in a chain take priority.
    record.title = string_value(candidates.get("title"));
    record.chemistry = string_value(candidates.get("chemistry"));
    record.voltage_v = parse_float(first_present(
        candidates,
        &["voltage_v", "voltage", "nominal_voltage"],
    ));
    record.capacity = string_value(candidates.get("capacity"));
    record.wh = parse_float(first_present(candidates, &["wh", "watt_hours"]));
    record.form_factor = string_value(first_present(candidates, &["form_factor", "size"]));
    record.dimensions = string_value(candidates.get("dimensions"));
    record.termination = string_value(candidates.get("termination"));
    record.rechargeable = parse_bool(candidates.get("rechargeable"));
    record.operating_temp = string_value(first_present(candidates, &["operating_temp", "temp_range"]));
    record.weight = string_value(candidates.get("weight"));
    record.datasheet_url = string_value(first_present(candidates, &["datasheet_url", "datasheet"]));
    record.source_urls = string_list(candidates.get("source_urls"));

    // Second pass: resolve raw alias keys into canonical fields the direct
    // lookups missed. Direct fields always win.
    for (key, value) in candidates {
        let Some(target) = canonical_alias(key.trim().to_lowercase().as_str()) else {
            continue;
        };
        apply_alias(&mut record, target, value);
    }

    record
}

fn apply_alias(record: &mut BatteryRecord, target: &str, value: &Value) {
    match target {
        "voltage_v" if record.voltage_v.is_none() => record.voltage_v = parse_float(Some(value)),
        "rechargeable" if record.rechargeable.is_none() => {
            record.rechargeable = parse_bool(Some(value))
        }
        "capacity" if record.capacity.is_none() => record.capacity = string_value(Some(value)),
        "chemistry" if record.chemistry.is_none() => record.chemistry = string_value(Some(value)),
        "form_factor" if record.form_factor.is_none() => {
            record.form_factor = string_value(Some(value))
        }
        "dimensions" if record.dimensions.is_none() => {
            record.dimensions = string_value(Some(value))
        }
        "termination" if record.termination.is_none() => {
            record.termination = string_value(Some(value))
        }
        "operating_temp" if record.operating_temp.is_none() => {
            record.operating_temp = string_value(Some(value))
        }
        "weight" if record.weight.is_none() => record.weight = string_value(Some(value)),
        "datasheet_url" if record.datasheet_url.is_none() => {
            record.datasheet_url = string_value(Some(value))
        }
        _ => {}
    }
}

/// First key whose value is present and non-empty
fn first_present<'a>(bag: &'a CandidateBag, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| bag.get(*key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
}

/// Parse a float, stripping known unit suffixes from string input
fn parse_float(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned = s
                .replace('V', "")
                .replace('v', "")
                .replace("Wh", "")
                .replace("wh", "");
            cleaned.trim().parse::<f64>().ok()
        }
        _ => None,
    }
}

/// Parse a tri-state boolean: true / false / unknown
fn parse_bool(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => {
            let lowered = s.to_lowercase();
            Some(matches!(
                lowered.as_str(),
                "true" | "yes" | "1" | "rechargeable" | "y"
            ))
        }
        Value::Number(n) => Some(n.as_f64().map(|f| f != 0.0).unwrap_or(false)),
        _ => None,
    }
}

/// Non-empty string content of a value; numbers render via Display
fn string_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: Value) -> CandidateBag {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_voltage_unit_suffix_stripped() {
        let candidates = bag(json!({ "voltage_v": "3.7V" }));
        let record = normalize_candidates(&candidates, "18650", "");
        assert_eq!(record.voltage_v, Some(3.7));
    }

    #[test]
    fn test_watt_hours_unit_suffix_stripped() {
        let candidates = bag(json!({ "wh": "9.62Wh" }));
        let record = normalize_candidates(&candidates, "18650", "");
        assert_eq!(record.wh, Some(9.62));
    }

    #[test]
    fn test_unparsable_number_yields_none() {
        let candidates = bag(json!({ "voltage_v": "not a number" }));
        let record = normalize_candidates(&candidates, "X1", "");
        assert_eq!(record.voltage_v, None);
    }

    #[test]
    fn test_numeric_voltage_passes_through() {
        let candidates = bag(json!({ "voltage_v": 3.0 }));
        let record = normalize_candidates(&candidates, "CR2032", "");
        assert_eq!(record.voltage_v, Some(3.0));
    }

    #[test]
    fn test_direct_field_wins_over_alias() {
        let candidates = bag(json!({ "voltage_v": 5.0, "voltage": "9V" }));
        let record = normalize_candidates(&candidates, "X1", "");
        assert_eq!(record.voltage_v, Some(5.0));
    }

    #[test]
    fn test_alias_fills_missing_field() {
        let candidates = bag(json!({ "Battery Type": "NiMH", "Temp Range": "0C to 40C" }));
        let record = normalize_candidates(&candidates, "X1", "");
        assert_eq!(record.chemistry.as_deref(), Some("NiMH"));
        assert_eq!(record.operating_temp.as_deref(), Some("0C to 40C"));
    }

    #[test]
    fn test_manufacturer_override_wins() {
        let candidates = bag(json!({ "manufacturer": "Duracell" }));
        let record = normalize_candidates(&candidates, "AA", "Panasonic");
        assert_eq!(record.manufacturer.as_deref(), Some("Panasonic"));
    }

    #[test]
    fn test_manufacturer_falls_back_to_candidates() {
        let candidates = bag(json!({ "manufacturer": "Duracell" }));
        let record = normalize_candidates(&candidates, "AA", "");
        assert_eq!(record.manufacturer.as_deref(), Some("Duracell"));
    }

    #[test]
    fn test_rechargeable_truthy_strings() {
        for input in ["true", "Yes", "1", "Rechargeable", "y"] {
            let candidates = bag(json!({ "rechargeable": input }));
            let record = normalize_candidates(&candidates, "X1", "");
            assert_eq!(record.rechargeable, Some(true), "input: {input}");
        }
    }

    #[test]
    fn test_rechargeable_other_string_is_false() {
        let candidates = bag(json!({ "rechargeable": "no" }));
        let record = normalize_candidates(&candidates, "X1", "");
        assert_eq!(record.rechargeable, Some(false));
    }

    #[test]
    fn test_rechargeable_absent_is_unknown() {
        let candidates = CandidateBag::new();
        let record = normalize_candidates(&candidates, "X1", "");
        assert_eq!(record.rechargeable, None);
    }

    #[test]
    fn test_empty_bag_yields_bare_record() {
        let candidates = CandidateBag::new();
        let record = normalize_candidates(&candidates, "UNKNOWN123", "");
        assert_eq!(record.mpn, "UNKNOWN123");
        assert_eq!(record.manufacturer.as_deref(), Some(""));
        assert!(record.chemistry.is_none());
        assert!(record.voltage_v.is_none());
        assert!(record.source_urls.is_empty());
    }

    #[test]
    fn test_source_urls_collected() {
        let candidates = bag(json!({ "source_urls": ["https://example.com/a", "https://example.com/b"] }));
        let record = normalize_candidates(&candidates, "X1", "");
        assert_eq!(record.source_urls.len(), 2);
    }
}
