//! Request-driven narrowing of a normalized snapshot.
//!
//! Predicates compose with AND semantics and keep input order. `limit` runs
//! last and keeps the trailing records.

use serde::Serialize;

use crate::allocation_record::AllocationRecord;

/// Effective filter values of one request. Absent values mean "no constraint".
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AllocationFilters {
    pub latest: bool,
    pub timestamp: Option<String>,
    pub zone: Option<String>,
    pub impact: Option<String>,
    pub critical_only: bool,
    pub limit: Option<usize>,
}

impl AllocationFilters {
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RecordPredicate<'a> {
    TimestampEquals(&'a str),
    Zone(String),
    Impact(String),
    CriticalOnly,
}

impl RecordPredicate<'_> {
    fn matches(&self, record: &AllocationRecord) -> bool {
        match self {
            Self::TimestampEquals(target) => record.timestamp == *target,
            Self::Zone(needle) => {
                record.zone_id.to_lowercase() == *needle
                    || record.zone_name.to_lowercase().contains(needle.as_str())
            }
            Self::Impact(needle) => record.impact_level.to_lowercase().contains(needle.as_str()),
            Self::CriticalOnly => record.is_critical_infra,
        }
    }
}

/// Builds the ordered predicate list: time predicates first, then attributes.
///
/// `latest` targets the timestamp of the last input record as-is; it assumes
/// the producing pipeline wrote rows in chronological order.
fn build_predicates<'a>(
    records: &'a [AllocationRecord],
    filters: &'a AllocationFilters,
) -> Vec<RecordPredicate<'a>> {
    let mut predicates = Vec::new();
    if filters.latest {
        if let Some(last) = records.last() {
            predicates.push(RecordPredicate::TimestampEquals(last.timestamp.as_str()));
        }
    }
    if let Some(timestamp) = filters.timestamp.as_deref() {
        predicates.push(RecordPredicate::TimestampEquals(timestamp));
    }
    if let Some(zone) = filters.zone.as_deref() {
        predicates.push(RecordPredicate::Zone(zone.to_lowercase()));
    }
    if let Some(impact) = filters.impact.as_deref() {
        predicates.push(RecordPredicate::Impact(impact.to_lowercase()));
    }
    if filters.critical_only {
        predicates.push(RecordPredicate::CriticalOnly);
    }
    predicates
}

pub fn apply_allocation_filters(
    records: &[AllocationRecord],
    filters: &AllocationFilters,
) -> Vec<AllocationRecord> {
    let predicates = build_predicates(records, filters);
    let mut filtered = records
        .iter()
        .filter(|record| predicates.iter().all(|predicate| predicate.matches(record)))
        .cloned()
        .collect::<Vec<_>>();
    if let Some(limit) = filters.limit {
        let excess = filtered.len().saturating_sub(limit);
        filtered.drain(..excess);
    }
    filtered
}
