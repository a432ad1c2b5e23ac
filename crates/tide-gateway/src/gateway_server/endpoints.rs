//! Shared endpoint constant definitions for the allocation gateway.

pub(super) const SCENARIOS_ENDPOINT: &str = "/scenarios";
pub(super) const SCENARIO_ALLOCATIONS_ENDPOINT: &str = "/scenarios/{name}/allocations";
pub(super) const SCENARIO_SUMMARY_ENDPOINT: &str = "/scenarios/{name}/summary";
pub(super) const GATEWAY_STATUS_ENDPOINT: &str = "/gateway/status";
