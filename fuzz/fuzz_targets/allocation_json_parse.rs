#![no_main]

use libfuzzer_sys::fuzz_target;
use tide_allocations::{normalize_allocation_rows, parse_allocation_json};

fuzz_target!(|data: &[u8]| {
    let Ok(Some(rows)) = parse_allocation_json(data) else {
        return;
    };
    let first_pass = normalize_allocation_rows(&rows);
    let raw_again: Vec<_> = first_pass
        .records
        .iter()
        .map(|record| record.to_raw_row())
        .collect();
    let second_pass = normalize_allocation_rows(&raw_again);
    assert_eq!(first_pass.records, second_pass.records);
    assert!(second_pass.warnings.is_empty());
});
