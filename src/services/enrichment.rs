//! Enrichment orchestration
//!
//! Sequences cache lookup → candidate fetch → normalize → overview →
//! cache write for one item at a time. The orchestrator is total: every
//! input yields exactly one record plus a (possibly empty) warning list.
//! Failures inside the pipeline become a degraded record carrying the
//! failure as a warning, never an error to the caller.

use std::sync::Arc;
use tracing::error;

use crate::config::Config;
use crate::models::{BatteryRecord, EnrichItem};
use crate::services::cache::RecordCache;
use crate::services::candidates::{CandidateProvider, StaticCandidateSource};
use crate::services::normalizer::normalize_candidates;
use crate::services::overview::OverviewGenerator;

/// Per-item enrichment pipeline
pub struct Enricher {
    provider: Arc<dyn CandidateProvider>,
    cache: RecordCache,
    overview: OverviewGenerator,
}

impl Enricher {
    /// Build the default pipeline (static candidate source) from configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            Arc::new(StaticCandidateSource::new()),
            RecordCache::new(&config.cache_dir)?,
            OverviewGenerator::new(config.gemini_api_key.clone())?,
        ))
    }

    pub fn new(
        provider: Arc<dyn CandidateProvider>,
        cache: RecordCache,
        overview: OverviewGenerator,
    ) -> Self {
        Self {
            provider,
            cache,
            overview,
        }
    }

    /// Enrich a single item
    ///
    /// A cache hit is returned verbatim with no warnings; the cache is
    /// authoritative once written. On a miss the full pipeline runs and the
    /// finished record is written back.
    pub async fn enrich_item(&self, item: &EnrichItem) -> (BatteryRecord, Vec<String>) {
        let mpn = item.mpn.trim();
        let manufacturer = item.manufacturer.trim();

        if let Some(cached) = self.cache.get(mpn) {
            return (cached, Vec::new());
        }

        match self.enrich_uncached(mpn, manufacturer).await {
            Ok(record) => (record, Vec::new()),
            Err(e) => {
                error!(mpn = %mpn, error = %e, "Enrichment failed");
                let warning = format!("Enrichment error: {e}");
                let record = BatteryRecord::minimal(mpn, manufacturer, vec![warning.clone()]);
                (record, vec![warning])
            }
        }
    }

    async fn enrich_uncached(&self, mpn: &str, manufacturer: &str) -> anyhow::Result<BatteryRecord> {
        let candidates = self.provider.fetch(mpn, manufacturer);
        let mut record = normalize_candidates(&candidates, mpn, manufacturer);
        record.overview = Some(self.overview.generate(&record).await);
        self.cache.put(mpn, &record);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_enricher(dir: &TempDir) -> Enricher {
        Enricher::new(
            Arc::new(StaticCandidateSource::new()),
            RecordCache::new(dir.path()).unwrap(),
            OverviewGenerator::new(None).unwrap(),
        )
    }

    fn item(mpn: &str, manufacturer: &str) -> EnrichItem {
        EnrichItem {
            mpn: mpn.to_string(),
            manufacturer: manufacturer.to_string(),
        }
    }

    #[tokio::test]
    async fn test_known_mpn_populates_specification_fields() {
        let dir = TempDir::new().unwrap();
        let enricher = test_enricher(&dir);

        let (record, warnings) = enricher.enrich_item(&item("CR2032", "Panasonic")).await;
        assert!(warnings.is_empty());
        assert_eq!(record.mpn, "CR2032");
        assert_eq!(record.manufacturer.as_deref(), Some("Panasonic"));
        assert_eq!(record.chemistry.as_deref(), Some("Lithium"));
        assert_eq!(record.voltage_v, Some(3.0));
        assert_eq!(record.form_factor.as_deref(), Some("Coin Cell"));
        assert!(record.overview.is_some());
    }

    #[tokio::test]
    async fn test_unknown_mpn_yields_bare_record_without_error() {
        let dir = TempDir::new().unwrap();
        let enricher = test_enricher(&dir);

        let (record, warnings) = enricher.enrich_item(&item("UNKNOWN123", "")).await;
        assert!(warnings.is_empty());
        assert_eq!(record.mpn, "UNKNOWN123");
        assert_eq!(record.manufacturer.as_deref(), Some(""));
        assert!(record.chemistry.is_none());
        assert!(record.voltage_v.is_none());
        assert!(record.form_factor.is_none());
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache_identically() {
        let dir = TempDir::new().unwrap();
        let enricher = test_enricher(&dir);
        let input = item("18650", "");

        let (first, _) = enricher.enrich_item(&input).await;
        let (second, warnings) = enricher.enrich_item(&input).await;
        assert!(warnings.is_empty());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_input_is_trimmed() {
        let dir = TempDir::new().unwrap();
        let enricher = test_enricher(&dir);

        let (record, _) = enricher.enrich_item(&item("  CR2032  ", " Panasonic ")).await;
        assert_eq!(record.mpn, "CR2032");
        assert_eq!(record.manufacturer.as_deref(), Some("Panasonic"));
    }
}
