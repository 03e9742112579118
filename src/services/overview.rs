//! Overview generation
//!
//! Produces a short description for a record, either via the Gemini
//! generateContent API or, when no key is configured or the call fails, a
//! deterministic template built from present fields. Generation is total:
//! every path yields a string, never an error.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::BatteryRecord;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-pro";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Gemini client errors (absorbed by the generator, never surfaced)
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Empty response")]
    EmptyResponse,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<ResponseCandidate>>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Gemini generateContent API client
struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
}

impl GeminiClient {
    fn new(api_key: String) -> Result<Self, GeminiError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| GeminiError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_BASE_URL, GEMINI_MODEL, self.api_key
        );

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GeminiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api(status.as_u16(), error_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Network(e.to_string()))?;

        parsed
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|p| p.into_iter().next())
            .and_then(|p| p.text)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(GeminiError::EmptyResponse)
    }
}

/// Overview generator with external call + deterministic template fallback
pub struct OverviewGenerator {
    client: Option<GeminiClient>,
}

impl OverviewGenerator {
    /// When `api_key` is `None` the generator only ever uses the template path
    pub fn new(api_key: Option<String>) -> anyhow::Result<Self> {
        let client = match api_key {
            Some(key) if !key.trim().is_empty() => Some(GeminiClient::new(key)?),
            _ => None,
        };
        Ok(Self { client })
    }

    /// Generate an overview for the record; always succeeds
    pub async fn generate(&self, record: &BatteryRecord) -> String {
        let Some(client) = &self.client else {
            return template_overview(record);
        };

        let prompt = build_prompt(record);
        match client.generate(&prompt).await {
            Ok(overview) => {
                info!(mpn = %record.mpn, "Generated overview via Gemini");
                overview
            }
            Err(e) => {
                warn!(mpn = %record.mpn, error = %e, "Gemini call failed, using template");
                template_overview(record)
            }
        }
    }
}

/// Prompt listing the present specification fields
fn build_prompt(record: &BatteryRecord) -> String {
    let mut fields = Vec::new();
    if let Some(chemistry) = &record.chemistry {
        fields.push(format!("Chemistry: {chemistry}"));
    }
    if let Some(voltage) = record.voltage_v {
        fields.push(format!("Voltage: {voltage}V"));
    }
    if let Some(capacity) = &record.capacity {
        fields.push(format!("Capacity: {capacity}"));
    }
    if let Some(form_factor) = &record.form_factor {
        fields.push(format!("Form Factor: {form_factor}"));
    }
    if let Some(dimensions) = &record.dimensions {
        fields.push(format!("Dimensions: {dimensions}"));
    }
    if let Some(rechargeable) = record.rechargeable {
        fields.push(format!("Rechargeable: {rechargeable}"));
    }

    format!(
        "Generate a brief 2-3 sentence overview for this battery:\n\
         MPN: {}\n\
         Manufacturer: {}\n\
         {}\n\n\
         Overview:",
        record.mpn,
        record
            .manufacturer
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or("N/A"),
        fields.join(" | ")
    )
}

/// Deterministic template overview built from present fields
pub fn template_overview(record: &BatteryRecord) -> String {
    let mut parts = Vec::new();
    if let Some(chemistry) = &record.chemistry {
        parts.push(chemistry.clone());
    }
    if let Some(voltage) = record.voltage_v {
        parts.push(format!("{voltage}V"));
    }
    if let Some(capacity) = &record.capacity {
        parts.push(format!("{capacity} capacity"));
    }
    if let Some(form_factor) = &record.form_factor {
        parts.push(form_factor.clone());
    }
    if let Some(rechargeable) = record.rechargeable {
        parts.push(
            if rechargeable {
                "rechargeable"
            } else {
                "non-rechargeable"
            }
            .to_string(),
        );
    }

    if parts.is_empty() {
        format!("{} battery specification.", record.mpn)
    } else {
        format!("{} is a {} battery.", record.mpn, parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_with_all_fragments() {
        let mut record = BatteryRecord::new("18650");
        record.chemistry = Some("Lithium-Ion".to_string());
        record.voltage_v = Some(3.7);
        record.capacity = Some("2600mAh".to_string());
        record.form_factor = Some("Cylindrical".to_string());
        record.rechargeable = Some(true);

        assert_eq!(
            template_overview(&record),
            "18650 is a Lithium-Ion 3.7V 2600mAh capacity Cylindrical rechargeable battery."
        );
    }

    #[test]
    fn test_template_non_rechargeable() {
        let mut record = BatteryRecord::new("CR2032");
        record.chemistry = Some("Lithium".to_string());
        record.rechargeable = Some(false);

        assert_eq!(
            template_overview(&record),
            "CR2032 is a Lithium non-rechargeable battery."
        );
    }

    #[test]
    fn test_template_fallback_without_fragments() {
        let record = BatteryRecord::new("UNKNOWN123");
        assert_eq!(template_overview(&record), "UNKNOWN123 battery specification.");
    }

    #[test]
    fn test_template_is_deterministic() {
        let mut record = BatteryRecord::new("AA");
        record.chemistry = Some("Alkaline".to_string());
        record.voltage_v = Some(1.5);

        let first = template_overview(&record);
        let second = template_overview(&record);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_generator_without_key_uses_template() {
        let generator = OverviewGenerator::new(None).unwrap();
        let mut record = BatteryRecord::new("AA");
        record.chemistry = Some("Alkaline".to_string());

        let overview = generator.generate(&record).await;
        assert_eq!(overview, "AA is a Alkaline battery.");
    }

    #[test]
    fn test_blank_key_disables_client() {
        let generator = OverviewGenerator::new(Some("   ".to_string())).unwrap();
        assert!(generator.client.is_none());
    }

    #[test]
    fn test_prompt_lists_present_fields() {
        let mut record = BatteryRecord::new("CR2032");
        record.manufacturer = Some("Panasonic".to_string());
        record.chemistry = Some("Lithium".to_string());
        record.voltage_v = Some(3.0);

        let prompt = build_prompt(&record);
        assert!(prompt.contains("MPN: CR2032"));
        assert!(prompt.contains("Manufacturer: Panasonic"));
        assert!(prompt.contains("Chemistry: Lithium | Voltage: 3V"));
    }
}
