//! Core services for the enrichment pipeline

pub mod cache;
pub mod candidates;
pub mod enrichment;
pub mod normalizer;
pub mod overview;
pub mod tabular;

pub use cache::RecordCache;
pub use candidates::{CandidateBag, CandidateProvider, StaticCandidateSource};
pub use enrichment::Enricher;
pub use overview::OverviewGenerator;
