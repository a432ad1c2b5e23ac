use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column names of an allocation snapshot, in file order.
pub const ALLOCATION_COLUMNS: [&str; 12] = [
    "timestamp",
    "scenario",
    "zone_id",
    "zone_name",
    "impact_level",
    "allocation_mode",
    "river_level_pred",
    "global_pf",
    "pf_zone",
    "vulnerability",
    "is_critical_infra",
    "units_allocated",
];

/// One untyped snapshot row keyed by column name.
pub type RawAllocationRow = serde_json::Map<String, Value>;

/// One zone's recommendation at one point in time.
///
/// `units_allocated` is never negative; the normalizer defaults it to 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AllocationRecord {
    pub timestamp: String,
    pub scenario: String,
    pub zone_id: String,
    pub zone_name: String,
    pub impact_level: String,
    pub allocation_mode: String,
    pub river_level_pred: Option<f64>,
    pub global_pf: Option<f64>,
    pub pf_zone: Option<f64>,
    pub vulnerability: Option<f64>,
    pub is_critical_infra: bool,
    pub units_allocated: f64,
}

impl AllocationRecord {
    /// Renders the record back into the loosely typed row shape.
    pub fn to_raw_row(&self) -> RawAllocationRow {
        let mut row = RawAllocationRow::new();
        row.insert("timestamp".to_string(), Value::from(self.timestamp.as_str()));
        row.insert("scenario".to_string(), Value::from(self.scenario.as_str()));
        row.insert("zone_id".to_string(), Value::from(self.zone_id.as_str()));
        row.insert("zone_name".to_string(), Value::from(self.zone_name.as_str()));
        row.insert(
            "impact_level".to_string(),
            Value::from(self.impact_level.as_str()),
        );
        row.insert(
            "allocation_mode".to_string(),
            Value::from(self.allocation_mode.as_str()),
        );
        row.insert(
            "river_level_pred".to_string(),
            Value::from(self.river_level_pred),
        );
        row.insert("global_pf".to_string(), Value::from(self.global_pf));
        row.insert("pf_zone".to_string(), Value::from(self.pf_zone));
        row.insert("vulnerability".to_string(), Value::from(self.vulnerability));
        row.insert(
            "is_critical_infra".to_string(),
            Value::from(self.is_critical_infra),
        );
        row.insert(
            "units_allocated".to_string(),
            Value::from(self.units_allocated),
        );
        row
    }
}
