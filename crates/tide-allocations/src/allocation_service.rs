//! Request orchestration: registry -> locator -> reader -> normalizer ->
//! filters -> aggregator -> assembler.
//!
//! Every call re-resolves the scenario and re-locates its newest snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tide_core::unix_timestamp_ms;
use tide_scenarios::{
    DirectorySnapshotLocator, ResolvedScenario, ScenarioRegistry, SnapshotKind, SnapshotLocator,
};

use crate::allocation_error::AllocationServiceError;
use crate::allocation_record::AllocationRecord;
use crate::filter_pipeline::{apply_allocation_filters, AllocationFilters};
use crate::record_normalizer::normalize_allocation_rows;
use crate::response_assembler::{assemble_allocations_response, AllocationsResponse};
use crate::snapshot_cache::{SnapshotFingerprint, SnapshotRecordCache};
use crate::snapshot_reader::{read_allocation_snapshot, read_summary_document, SnapshotParseError};
use crate::zone_aggregator::aggregate_zone_allocations;

/// One entry of the scenario listing, without row-level data.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScenarioListing {
    #[serde(flatten)]
    pub scenario: ResolvedScenario,
    pub latest_summary: Option<Value>,
    pub latest_summary_file: Option<String>,
    pub latest_allocation_file: Option<String>,
    pub latest_allocation_modified_unix_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_error: Option<String>,
}

/// The newest precomputed summary document of a scenario, returned verbatim.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScenarioSummaryDocument {
    pub scenario: String,
    pub file: String,
    pub summary: Value,
}

pub struct AllocationService {
    registry: Arc<ScenarioRegistry>,
    locator: Arc<dyn SnapshotLocator>,
    cache: Option<SnapshotRecordCache>,
}

impl AllocationService {
    pub fn new(registry: Arc<ScenarioRegistry>) -> Self {
        Self {
            registry,
            locator: Arc::new(DirectorySnapshotLocator),
            cache: None,
        }
    }

    pub fn with_locator(mut self, locator: Arc<dyn SnapshotLocator>) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_snapshot_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(SnapshotRecordCache::default);
        self
    }

    pub fn registry(&self) -> &Arc<ScenarioRegistry> {
        &self.registry
    }

    pub fn snapshot_cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub fn cached_snapshots(&self) -> usize {
        self.cache.as_ref().map_or(0, SnapshotRecordCache::len)
    }

    fn locate(
        &self,
        scenario: &ResolvedScenario,
        kind: SnapshotKind,
    ) -> Result<PathBuf, AllocationServiceError> {
        self.locator
            .latest_snapshot(&scenario.results_dir, kind)
            .ok_or_else(|| AllocationServiceError::SnapshotNotFound {
                scenario: scenario.scenario.name.clone(),
                kind,
            })
    }

    #[tracing::instrument(
        name = "tide_allocations.service.allocations",
        skip(self, filters),
        fields(scenario = %scenario_name)
    )]
    pub fn allocations(
        &self,
        scenario_name: &str,
        filters: AllocationFilters,
    ) -> Result<AllocationsResponse, AllocationServiceError> {
        let scenario = self.registry.get(scenario_name)?;
        let snapshot_path = self.locate(&scenario, SnapshotKind::Allocation)?;
        let records = self.load_records(scenario.name(), &snapshot_path)?;

        let filtered = apply_allocation_filters(&records, &filters);
        let summary = aggregate_zone_allocations(&filtered);
        tracing::debug!(
            snapshot = %snapshot_path.display(),
            total_rows = records.len(),
            returned_rows = filtered.len(),
            zones = summary.zones.len(),
            unconstrained = filters.is_unconstrained(),
            "assembled allocation rollup"
        );
        Ok(assemble_allocations_response(
            &scenario.scenario,
            &snapshot_path,
            &records,
            filtered,
            filters,
            summary,
        ))
    }

    #[tracing::instrument(
        name = "tide_allocations.service.latest_summary",
        skip(self),
        fields(scenario = %scenario_name)
    )]
    pub fn latest_summary(
        &self,
        scenario_name: &str,
    ) -> Result<ScenarioSummaryDocument, AllocationServiceError> {
        let scenario = self.registry.get(scenario_name)?;
        let summary_path = self.locate(&scenario, SnapshotKind::Summary)?;
        let summary = read_summary_document(&summary_path)?;
        Ok(ScenarioSummaryDocument {
            scenario: scenario.scenario.name,
            file: file_name_of(&summary_path),
            summary,
        })
    }

    /// Lists every configured scenario with its newest artifacts.
    ///
    /// A broken summary document is reported per scenario instead of failing
    /// the whole listing.
    pub fn list_scenarios(&self) -> Vec<ScenarioListing> {
        self.registry
            .scenarios()
            .into_iter()
            .map(|scenario| {
                let summary_path = self
                    .locator
                    .latest_snapshot(&scenario.results_dir, SnapshotKind::Summary);
                let allocation_path = self
                    .locator
                    .latest_snapshot(&scenario.results_dir, SnapshotKind::Allocation);
                let (latest_summary, summary_error) = match summary_path.as_deref() {
                    Some(path) => match read_summary_document(path) {
                        Ok(document) => (Some(document), None),
                        Err(error) => {
                            tracing::warn!(
                                scenario = scenario.name(),
                                %error,
                                "latest summary document is unreadable"
                            );
                            (None, Some(error.to_string()))
                        }
                    },
                    None => (None, None),
                };
                ScenarioListing {
                    latest_summary,
                    latest_summary_file: summary_path.as_deref().map(file_name_of),
                    latest_allocation_file: allocation_path.as_deref().map(file_name_of),
                    latest_allocation_modified_unix_ms: allocation_path
                        .as_deref()
                        .and_then(|path| std::fs::metadata(path).ok())
                        .and_then(|metadata| metadata.modified().ok())
                        .and_then(unix_timestamp_ms),
                    summary_error,
                    scenario,
                }
            })
            .collect()
    }

    fn load_records(
        &self,
        scenario: &str,
        snapshot_path: &Path,
    ) -> Result<Arc<Vec<AllocationRecord>>, SnapshotParseError> {
        let Some(cache) = self.cache.as_ref() else {
            return read_normalized_snapshot(snapshot_path).map(Arc::new);
        };
        let fingerprint =
            SnapshotFingerprint::read(snapshot_path).map_err(|source| SnapshotParseError::Read {
                path: snapshot_path.to_path_buf(),
                source,
            })?;
        if let Some(records) = cache.get(scenario, snapshot_path, fingerprint) {
            tracing::debug!(snapshot = %snapshot_path.display(), "snapshot cache hit");
            return Ok(records);
        }
        let records = Arc::new(read_normalized_snapshot(snapshot_path)?);
        cache.insert(scenario, snapshot_path, fingerprint, Arc::clone(&records));
        Ok(records)
    }
}

fn read_normalized_snapshot(path: &Path) -> Result<Vec<AllocationRecord>, SnapshotParseError> {
    let rows = read_allocation_snapshot(path)?;
    let normalized = normalize_allocation_rows(&rows);
    if let Some(first) = normalized.warnings.first() {
        tracing::warn!(
            snapshot = %path.display(),
            defaulted_fields = normalized.warnings.len(),
            first_field = first.field,
            first_value = %first.raw_value,
            "defaulted uncoercible snapshot fields"
        );
        for warning in &normalized.warnings {
            tracing::debug!(field = warning.field, value = %warning.raw_value, "field coercion");
        }
    }
    Ok(normalized.records)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
