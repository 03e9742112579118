//! Configuration for battery-enrich
//!
//! All settings come from the environment and are carried in an explicit
//! `Config` struct passed into component constructors, so components stay
//! testable in isolation.

use std::path::PathBuf;
use tracing::warn;

const DEFAULT_CACHE_DIR: &str = "data/cache";
const DEFAULT_PORT: u16 = 8000;

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding per-MPN cache files (`BATTERY_ENRICH_CACHE_DIR`)
    pub cache_dir: PathBuf,
    /// Gemini API key (`GEMINI_API_KEY`); template overviews only when absent
    pub gemini_api_key: Option<String>,
    /// HTTP listen port (`BATTERY_ENRICH_PORT`)
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        let cache_dir = std::env::var("BATTERY_ENRICH_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CACHE_DIR));

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let port = match std::env::var("BATTERY_ENRICH_PORT") {
            Ok(value) => value.parse().unwrap_or_else(|_| {
                warn!(value = %value, "Invalid BATTERY_ENRICH_PORT, using default");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        Self {
            cache_dir,
            gemini_api_key,
            port,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            gemini_api_key: None,
            port: DEFAULT_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cache_dir, PathBuf::from("data/cache"));
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.port, 8000);
    }
}
