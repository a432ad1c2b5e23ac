//! Scenario configuration, registry, and snapshot discovery for Tide.
//!
//! Loads the declarative scenario list once, resolves each scenario's result
//! directory, and locates the most recent pipeline artifacts inside it.

pub mod scenario_config;
pub mod scenario_registry;
pub mod snapshot_locator;

pub use scenario_config::{
    load_scenario_config, parse_scenario_config, ResolvedScenario, Scenario, ScenarioCatalog,
    ScenarioConfigDocument, ScenarioConfigError, ScenarioConfigFormat, DEFAULT_RESULTS_ROOT,
};
pub use scenario_registry::{ScenarioNotFound, ScenarioRegistry};
pub use snapshot_locator::{
    DirectorySnapshotLocator, SnapshotKind, SnapshotLocator, ALLOCATION_SNAPSHOT_PREFIX,
    SUMMARY_SNAPSHOT_PREFIX,
};
