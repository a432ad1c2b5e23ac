use std::collections::HashMap;

use serde::Serialize;

use crate::allocation_record::AllocationRecord;

/// Rollup of every record sharing one `zone_id`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ZoneAllocationSummary {
    pub zone_id: String,
    pub zone_name: String,
    /// True when any contributing record is marked critical.
    pub is_critical_infra: bool,
    pub total_units: f64,
    pub entries: usize,
    pub latest_timestamp: String,
    pub latest_units: f64,
    pub last_impact: String,
    pub latest_is_critical_infra: bool,
}

impl ZoneAllocationSummary {
    fn open(record: &AllocationRecord) -> Self {
        Self {
            zone_id: record.zone_id.clone(),
            zone_name: record.zone_name.clone(),
            is_critical_infra: false,
            total_units: 0.0,
            entries: 0,
            latest_timestamp: record.timestamp.clone(),
            latest_units: record.units_allocated,
            last_impact: record.impact_level.clone(),
            latest_is_critical_infra: record.is_critical_infra,
        }
    }

    fn absorb(&mut self, record: &AllocationRecord) {
        self.total_units = saturating_unit_sum(self.total_units, record.units_allocated);
        self.entries = self.entries.saturating_add(1);
        self.is_critical_infra |= record.is_critical_infra;
        if self.zone_name.is_empty() {
            self.zone_name = record.zone_name.clone();
        }
        // `>=` lets the later row win on equal timestamps.
        if record.timestamp.as_str() >= self.latest_timestamp.as_str() {
            self.latest_timestamp = record.timestamp.clone();
            self.latest_units = record.units_allocated;
            self.last_impact = record.impact_level.clone();
            self.latest_is_critical_infra = record.is_critical_infra;
        }
    }
}

/// Adds unit counts, pinning at `f64::MAX` instead of overflowing to infinity.
///
/// Each `units_allocated` is finite, but a sum of huge values is not, and JSON
/// has no representation for infinity.
fn saturating_unit_sum(total: f64, units: f64) -> f64 {
    let sum = total + units;
    if sum.is_finite() {
        sum
    } else {
        f64::MAX
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AllocationTotals {
    pub total_units: f64,
    /// Sum of units over records individually marked critical.
    pub critical_units: f64,
    pub zone_count: usize,
    pub critical_zone_count: usize,
    pub record_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AllocationSummary {
    #[serde(flatten)]
    pub totals: AllocationTotals,
    /// Ordered by `total_units`, descending; ties keep first-seen zone order.
    pub zones: Vec<ZoneAllocationSummary>,
}

pub fn aggregate_zone_allocations(records: &[AllocationRecord]) -> AllocationSummary {
    let mut totals = AllocationTotals::default();
    let mut zones: Vec<ZoneAllocationSummary> = Vec::new();
    let mut zone_positions: HashMap<&str, usize> = HashMap::new();

    for record in records {
        totals.record_count = totals.record_count.saturating_add(1);
        if record.is_critical_infra {
            totals.critical_units =
                saturating_unit_sum(totals.critical_units, record.units_allocated);
        }
        let position = *zone_positions
            .entry(record.zone_id.as_str())
            .or_insert_with(|| {
                zones.push(ZoneAllocationSummary::open(record));
                zones.len() - 1
            });
        zones[position].absorb(record);
    }

    zones.sort_by(|left, right| right.total_units.total_cmp(&left.total_units));
    // Summed from the zones in output order so the grand total equals the sum
    // a client computes over `zones`, bit for bit.
    totals.total_units = zones
        .iter()
        .fold(0.0, |total, zone| saturating_unit_sum(total, zone.total_units));
    totals.zone_count = zones.len();
    totals.critical_zone_count = zones.iter().filter(|zone| zone.is_critical_infra).count();
    AllocationSummary { totals, zones }
}
