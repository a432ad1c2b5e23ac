//! Optional per-scenario cache of normalized allocation snapshots.
//!
//! An entry is only served while the freshly located snapshot path matches the
//! cached one and the file length and modification time are unchanged.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use crate::allocation_record::AllocationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotFingerprint {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SnapshotFingerprint {
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self {
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

#[derive(Debug, Clone)]
struct CachedSnapshot {
    path: PathBuf,
    fingerprint: SnapshotFingerprint,
    records: Arc<Vec<AllocationRecord>>,
}

#[derive(Debug, Default)]
pub struct SnapshotRecordCache {
    entries: Mutex<HashMap<String, CachedSnapshot>>,
}

impl SnapshotRecordCache {
    pub fn get(
        &self,
        scenario: &str,
        path: &Path,
        fingerprint: SnapshotFingerprint,
    ) -> Option<Arc<Vec<AllocationRecord>>> {
        // Without an mtime a rewrite of equal length would be indistinguishable.
        fingerprint.modified?;
        let entries = self.entries.lock().ok()?;
        entries
            .get(scenario)
            .filter(|cached| cached.path == path && cached.fingerprint == fingerprint)
            .map(|cached| Arc::clone(&cached.records))
    }

    pub fn insert(
        &self,
        scenario: &str,
        path: &Path,
        fingerprint: SnapshotFingerprint,
        records: Arc<Vec<AllocationRecord>>,
    ) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                scenario.to_string(),
                CachedSnapshot {
                    path: path.to_path_buf(),
                    fingerprint,
                    records,
                },
            );
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
