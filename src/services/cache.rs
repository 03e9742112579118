//! Flat-file record cache
//!
//! One pretty-printed JSON file per part number under the cache directory.
//! Entries never expire and are never invalidated; a cached record is
//! authoritative once written. All I/O failures degrade to a miss or a no-op
//! and are logged, never propagated.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::BatteryRecord;

/// Persistent record cache keyed by part number (case-sensitive)
pub struct RecordCache {
    dir: PathBuf,
}

impl RecordCache {
    /// Open the cache, creating the directory if missing
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, mpn: &str) -> PathBuf {
        self.dir.join(format!("{mpn}.json"))
    }

    /// Look up a cached record; corrupt or unreadable entries count as a miss
    pub fn get(&self, mpn: &str) -> Option<BatteryRecord> {
        let path = self.path_for(mpn);
        if !path.exists() {
            return None;
        }

        match read_record(&path) {
            Ok(record) => {
                info!(mpn = %mpn, "Cache hit");
                Some(record)
            }
            Err(e) => {
                warn!(mpn = %mpn, error = %e, "Cache entry unreadable, treating as miss");
                None
            }
        }
    }

    /// Store a record; failures are logged and swallowed (last write wins)
    pub fn put(&self, mpn: &str, record: &BatteryRecord) {
        let path = self.path_for(mpn);
        match write_record(&path, record) {
            Ok(()) => info!(mpn = %mpn, "Cached record"),
            Err(e) => warn!(mpn = %mpn, error = %e, "Failed to cache record"),
        }
    }
}

fn read_record(path: &Path) -> anyhow::Result<BatteryRecord> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn write_record(path: &Path, record: &BatteryRecord) -> anyhow::Result<()> {
    let bytes = serde_json::to_vec_pretty(record)?;
    fs::write(path, bytes)?;
    Ok(())
}
