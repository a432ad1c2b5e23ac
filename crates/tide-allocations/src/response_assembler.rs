use std::path::Path;

use serde::Serialize;
use tide_core::current_unix_timestamp_ms;
use tide_scenarios::Scenario;

use crate::allocation_record::AllocationRecord;
use crate::filter_pipeline::AllocationFilters;
use crate::zone_aggregator::AllocationSummary;

/// First/last timestamp by position in the returned sequence, not min/max.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AllocationTimeRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl AllocationTimeRange {
    pub fn from_records(records: &[AllocationRecord]) -> Self {
        Self {
            start: records.first().map(|record| record.timestamp.clone()),
            end: records.last().map(|record| record.timestamp.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ScenarioBudget {
    pub total_units: Option<u64>,
    pub max_units_per_zone: Option<u64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AllocationsMeta {
    pub scenario: String,
    pub file: String,
    pub total_rows: usize,
    pub returned_rows: usize,
    pub filters: AllocationFilters,
    pub time_range: AllocationTimeRange,
    pub budget: ScenarioBudget,
    pub generated_unix_ms: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AllocationsResponse {
    pub meta: AllocationsMeta,
    pub summary: AllocationSummary,
    pub data: Vec<AllocationRecord>,
}

pub fn assemble_allocations_response(
    scenario: &Scenario,
    snapshot_path: &Path,
    all_records: &[AllocationRecord],
    filtered_records: Vec<AllocationRecord>,
    filters: AllocationFilters,
    summary: AllocationSummary,
) -> AllocationsResponse {
    let file = snapshot_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| snapshot_path.display().to_string());
    AllocationsResponse {
        meta: AllocationsMeta {
            scenario: scenario.name.clone(),
            file,
            total_rows: all_records.len(),
            returned_rows: filtered_records.len(),
            filters,
            time_range: AllocationTimeRange::from_records(&filtered_records),
            budget: ScenarioBudget {
                total_units: scenario.total_units,
                max_units_per_zone: scenario.max_units_per_zone,
            },
            generated_unix_ms: current_unix_timestamp_ms(),
        },
        summary,
        data: filtered_records,
    }
}
