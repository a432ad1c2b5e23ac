#![no_main]

use libfuzzer_sys::fuzz_target;
use tide_allocations::{
    aggregate_zone_allocations, apply_allocation_filters, normalize_allocation_rows,
    parse_allocation_csv, AllocationFilters,
};

fuzz_target!(|data: &[u8]| {
    let Ok(rows) = parse_allocation_csv(data) else {
        return;
    };
    let normalized = normalize_allocation_rows(&rows);
    assert_eq!(normalized.records.len(), rows.len());
    assert!(normalized
        .records
        .iter()
        .all(|record| record.units_allocated >= 0.0 && record.units_allocated.is_finite()));

    let filters = AllocationFilters {
        latest: data.first().is_some_and(|byte| byte & 1 == 1),
        critical_only: data.last().is_some_and(|byte| byte & 1 == 1),
        limit: data.get(1).map(|byte| usize::from(*byte) + 1),
        ..AllocationFilters::default()
    };
    let filtered = apply_allocation_filters(&normalized.records, &filters);
    assert!(filtered.len() <= normalized.records.len());
    if filters.critical_only {
        assert!(filtered.iter().all(|record| record.is_critical_infra));
    }

    let summary = aggregate_zone_allocations(&filtered);
    assert_eq!(summary.totals.record_count, filtered.len());
    let entries: usize = summary.zones.iter().map(|zone| zone.entries).sum();
    assert_eq!(entries, filtered.len());
    let zone_sum = summary
        .zones
        .iter()
        .fold(0.0, |total: f64, zone| {
            let sum = total + zone.total_units;
            if sum.is_finite() {
                sum
            } else {
                f64::MAX
            }
        });
    assert_eq!(zone_sum, summary.totals.total_units);
    assert!(summary.totals.total_units.is_finite());
    assert!(summary.totals.critical_units.is_finite());
    // Critical units are summed per record and totals per zone, so allow rounding.
    let tolerance = summary.totals.total_units.abs() * 1e-9;
    assert!(summary.totals.critical_units <= summary.totals.total_units + tolerance);
});
