//! Typed normalization of raw snapshot rows.
//!
//! Coercion is lenient per field:
//! - text columns: strings pass through, numbers/booleans are rendered, absent is `""`;
//! - `river_level_pred`, `global_pf`, `pf_zone`, `vulnerability`: parsed as finite
//!   floats, blank or absent is `None`, anything unparsable is `None` plus a warning;
//! - `is_critical_infra`: `true`, `1`, `yes`, `y` (any case), everything else `false`;
//! - `units_allocated`: parsed like the floats above but defaults to `0`, and a
//!   negative value is replaced by `0` with a warning. Rollups of very large
//!   values saturate at `f64::MAX` (see `zone_aggregator`).
//!
//! No row is ever rejected.

use serde_json::Value;
use tide_core::is_truthy_value;

use crate::allocation_record::{AllocationRecord, RawAllocationRow};

/// A field that could not be coerced and was defaulted instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCoercionWarning {
    pub field: &'static str,
    pub raw_value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedSnapshot {
    pub records: Vec<AllocationRecord>,
    pub warnings: Vec<FieldCoercionWarning>,
}

pub fn normalize_allocation_row(raw: &RawAllocationRow) -> AllocationRecord {
    let mut warnings = Vec::new();
    normalize_allocation_row_with_warnings(raw, &mut warnings)
}

pub fn normalize_allocation_row_with_warnings(
    raw: &RawAllocationRow,
    warnings: &mut Vec<FieldCoercionWarning>,
) -> AllocationRecord {
    AllocationRecord {
        timestamp: coerce_text(raw.get("timestamp")),
        scenario: coerce_text(raw.get("scenario")),
        zone_id: coerce_text(raw.get("zone_id")),
        zone_name: coerce_text(raw.get("zone_name")),
        impact_level: coerce_text(raw.get("impact_level")),
        allocation_mode: coerce_text(raw.get("allocation_mode")),
        river_level_pred: coerce_number(raw, "river_level_pred", warnings),
        global_pf: coerce_number(raw, "global_pf", warnings),
        pf_zone: coerce_number(raw, "pf_zone", warnings),
        vulnerability: coerce_number(raw, "vulnerability", warnings),
        is_critical_infra: is_truthy_value(raw.get("is_critical_infra")),
        units_allocated: coerce_units(raw, warnings),
    }
}

pub fn normalize_allocation_rows(rows: &[RawAllocationRow]) -> NormalizedSnapshot {
    let mut snapshot = NormalizedSnapshot {
        records: Vec::with_capacity(rows.len()),
        warnings: Vec::new(),
    };
    for row in rows {
        let record = normalize_allocation_row_with_warnings(row, &mut snapshot.warnings);
        snapshot.records.push(record);
    }
    snapshot
}

fn coerce_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn coerce_number(
    raw: &RawAllocationRow,
    field: &'static str,
    warnings: &mut Vec<FieldCoercionWarning>,
) -> Option<f64> {
    let parsed = match raw.get(field) {
        None | Some(Value::Null) => return None,
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()
        }
        Some(_) => None,
    };
    match parsed.filter(|value| value.is_finite()) {
        Some(value) => Some(value),
        None => {
            warnings.push(FieldCoercionWarning {
                field,
                raw_value: render_raw_value(raw.get(field)),
            });
            None
        }
    }
}

fn coerce_units(raw: &RawAllocationRow, warnings: &mut Vec<FieldCoercionWarning>) -> f64 {
    match coerce_number(raw, "units_allocated", warnings) {
        Some(units) if units > 0.0 => units,
        Some(units) if units < 0.0 => {
            warnings.push(FieldCoercionWarning {
                field: "units_allocated",
                raw_value: render_raw_value(raw.get("units_allocated")),
            });
            0.0
        }
        _ => 0.0,
    }
}

fn render_raw_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
