//! Latest-artifact discovery inside a scenario result directory.
//!
//! Pipeline artifacts embed a zero-padded timestamp after a fixed prefix, so
//! the lexicographically greatest filename is also the most recent one.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub const SUMMARY_SNAPSHOT_PREFIX: &str = "summary_";
pub const ALLOCATION_SNAPSHOT_PREFIX: &str = "allocations_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    Summary,
    Allocation,
}

impl SnapshotKind {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Summary => SUMMARY_SNAPSHOT_PREFIX,
            Self::Allocation => ALLOCATION_SNAPSHOT_PREFIX,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Allocation => "allocation",
        }
    }
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait contract for finding the most recent artifact of a scenario.
///
/// Callers re-invoke it per request; implementations must not cache results.
pub trait SnapshotLocator: Send + Sync {
    /// Returns the newest file in `scenario_dir` whose name starts with `prefix`,
    /// or `None` when the directory is missing or holds no match.
    fn latest_file(&self, scenario_dir: &Path, prefix: &str) -> Option<PathBuf>;

    fn latest_snapshot(&self, scenario_dir: &Path, kind: SnapshotKind) -> Option<PathBuf> {
        self.latest_file(scenario_dir, kind.prefix())
    }
}

/// [`SnapshotLocator`] backed by a plain directory listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectorySnapshotLocator;

impl SnapshotLocator for DirectorySnapshotLocator {
    fn latest_file(&self, scenario_dir: &Path, prefix: &str) -> Option<PathBuf> {
        let entries = match std::fs::read_dir(scenario_dir) {
            Ok(entries) => entries,
            Err(error) => {
                tracing::debug!(
                    scenario_dir = %scenario_dir.display(),
                    prefix,
                    %error,
                    "scenario result directory is not readable"
                );
                return None;
            }
        };
        entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(prefix))
            .max()
            .map(|name| scenario_dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{DirectorySnapshotLocator, SnapshotKind, SnapshotLocator};

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "").expect("touch");
    }

    #[test]
    fn latest_file_returns_lexicographically_greatest_match() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let dir = tempdir.path();
        touch(dir, "allocations_20240301T120000.csv");
        touch(dir, "allocations_20240315T060000.csv");
        touch(dir, "allocations_20240302T230000.csv");
        touch(dir, "summary_20240401T000000.json");
        touch(dir, "zz_allocations_20991231T000000.csv");
        std::fs::create_dir(dir.join("allocations_20991231T000000")).expect("mkdir");

        let locator = DirectorySnapshotLocator;
        assert_eq!(
            locator.latest_snapshot(dir, SnapshotKind::Allocation),
            Some(dir.join("allocations_20240315T060000.csv"))
        );
        assert_eq!(
            locator.latest_snapshot(dir, SnapshotKind::Summary),
            Some(dir.join("summary_20240401T000000.json"))
        );
    }

    #[test]
    fn latest_file_is_none_for_missing_or_empty_directory() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let locator = DirectorySnapshotLocator;
        assert_eq!(locator.latest_file(tempdir.path(), "allocations_"), None);
        assert_eq!(
            locator.latest_file(&tempdir.path().join("never-populated"), "allocations_"),
            None
        );
    }

    #[test]
    fn latest_file_sees_files_written_after_a_previous_lookup() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let dir = tempdir.path();
        let locator = DirectorySnapshotLocator;
        touch(dir, "allocations_20240101T000000.csv");
        assert_eq!(
            locator.latest_file(dir, "allocations_"),
            Some(dir.join("allocations_20240101T000000.csv"))
        );
        touch(dir, "allocations_20240102T000000.csv");
        assert_eq!(
            locator.latest_file(dir, "allocations_"),
            Some(dir.join("allocations_20240102T000000.csv"))
        );
    }

    #[test]
    fn snapshot_kind_labels() {
        assert_eq!(SnapshotKind::Allocation.prefix(), "allocations_");
        assert_eq!(SnapshotKind::Summary.prefix(), "summary_");
        assert_eq!(SnapshotKind::Allocation.to_string(), "allocation");
    }
}
