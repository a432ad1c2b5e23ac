//! Scenario allocation aggregation for Tide.
//!
//! Reads the newest allocation snapshot of a scenario, normalizes its rows,
//! applies request filters, and rolls the result up per zone. Every stage
//! except snapshot discovery and reading is a pure function of its input.

pub mod allocation_error;
pub mod allocation_record;
pub mod allocation_service;
pub mod filter_pipeline;
pub mod record_normalizer;
pub mod response_assembler;
pub mod snapshot_cache;
pub mod snapshot_reader;
pub mod zone_aggregator;

pub use allocation_error::AllocationServiceError;
pub use allocation_record::{AllocationRecord, RawAllocationRow, ALLOCATION_COLUMNS};
pub use allocation_service::{AllocationService, ScenarioListing, ScenarioSummaryDocument};
pub use filter_pipeline::{apply_allocation_filters, AllocationFilters};
pub use record_normalizer::{
    normalize_allocation_row, normalize_allocation_row_with_warnings, normalize_allocation_rows,
    FieldCoercionWarning, NormalizedSnapshot,
};
pub use response_assembler::{
    assemble_allocations_response, AllocationTimeRange, AllocationsMeta, AllocationsResponse,
    ScenarioBudget,
};
pub use snapshot_cache::{SnapshotFingerprint, SnapshotRecordCache};
pub use snapshot_reader::{
    parse_allocation_csv, parse_allocation_json, read_allocation_snapshot, read_summary_document,
    SnapshotParseError,
};
pub use zone_aggregator::{
    aggregate_zone_allocations, AllocationSummary, AllocationTotals, ZoneAllocationSummary,
};
