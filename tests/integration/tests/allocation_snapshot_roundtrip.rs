use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{SystemTime, UNIX_EPOCH},
};

use serde_json::{json, Value};
use tide_allocations::{AllocationFilters, AllocationService, AllocationServiceError};
use tide_scenarios::ScenarioRegistry;

static WORKSPACE_COUNTER: AtomicU64 = AtomicU64::new(1);

const HEADER: &str = "timestamp,scenario,zone_id,zone_name,impact_level,allocation_mode,river_level_pred,global_pf,pf_zone,vulnerability,is_critical_infra,units_allocated";

struct IsolatedWorkspace {
    root: PathBuf,
}

impl IsolatedWorkspace {
    fn new(label: &str) -> Self {
        let tick = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let count = WORKSPACE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let root = std::env::temp_dir().join(format!(
            "tide-{label}-{}-{tick}-{count}",
            std::process::id()
        ));
        fs::create_dir_all(&root).expect("must create isolated workspace root");
        Self { root }
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn service(&self, scenarios: &[&str]) -> AllocationService {
        let mut raw = String::new();
        for name in scenarios {
            raw.push_str(&format!(
                "[[scenarios]]\nname = \"{name}\"\nsource_file = \"data/{name}.csv\"\n\n"
            ));
        }
        let config = self.root.join("scenarios.toml");
        fs::write(&config, raw).expect("write scenario config");
        let registry = ScenarioRegistry::load(&config).expect("load scenario config");
        AllocationService::new(Arc::new(registry))
    }

    fn write_snapshot(&self, scenario: &str, file_name: &str, raw: &str) {
        let dir = self.root.join("results").join(scenario);
        fs::create_dir_all(&dir).expect("create results dir");
        fs::write(dir.join(file_name), raw).expect("write snapshot");
    }
}

impl Drop for IsolatedWorkspace {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn csv_snapshot(rows: &[&str]) -> String {
    let mut raw = format!("{HEADER}\n");
    for row in rows {
        raw.push_str(row);
        raw.push('\n');
    }
    raw
}

#[test]
fn integration_latest_filter_selects_final_timestamp_rollup() {
    let workspace = IsolatedWorkspace::new("latest");
    workspace.write_snapshot(
        "baseline",
        "allocations_20240315T060000.csv",
        &csv_snapshot(&[
            "t1,baseline,Z1N,North,High,proportional,4.1,0.4,0.6,0.2,true,40",
            "t1,baseline,Z2,South,Low,proportional,3.0,0.4,0.1,0.1,true,10",
            "t2,baseline,Z1N,North,High,proportional,4.4,0.5,0.7,0.2,true,25",
        ]),
    );
    let service = workspace.service(&["baseline"]);

    let response = service
        .allocations(
            "baseline",
            AllocationFilters {
                latest: true,
                ..AllocationFilters::default()
            },
        )
        .expect("latest rollup");
    assert_eq!(response.summary.zones.len(), 1);
    let zone = &response.summary.zones[0];
    assert_eq!(zone.zone_id, "Z1N");
    assert_eq!(zone.total_units, 25.0);
    assert_eq!(zone.entries, 1);
    assert_eq!(response.summary.totals.critical_units, 25.0);
    assert_eq!(response.meta.total_rows, 3);
}

#[test]
fn integration_empty_units_and_bad_numbers_degrade_to_defaults() {
    let workspace = IsolatedWorkspace::new("coercion");
    workspace.write_snapshot(
        "baseline",
        "allocations_20240315T060000.csv",
        &csv_snapshot(&[
            "t1,baseline,Z1,North,High,proportional,n/a,0.4,,0.2,true,",
            "t1,baseline,Z2,South,Low,proportional,3.0,0.4,0.1,0.1,false,12",
        ]),
    );
    let service = workspace.service(&["baseline"]);

    let response = service
        .allocations("baseline", AllocationFilters::default())
        .expect("lenient rollup");
    assert_eq!(response.data[0].units_allocated, 0.0);
    assert_eq!(response.data[0].river_level_pred, None);
    assert_eq!(response.data[0].pf_zone, None);
    assert_eq!(response.data[0].global_pf, Some(0.4));
    assert_eq!(response.summary.totals.total_units, 12.0);
    assert_eq!(response.summary.totals.critical_units, 0.0);
    let zone_sum: f64 = response
        .summary
        .zones
        .iter()
        .map(|zone| zone.total_units)
        .sum();
    assert_eq!(zone_sum, response.summary.totals.total_units);
}

#[test]
fn integration_zero_row_snapshots_yield_empty_rollups() {
    let workspace = IsolatedWorkspace::new("zero-rows");
    workspace.write_snapshot("csv-run", "allocations_20240101T000000.csv", &format!("{HEADER}\n"));
    workspace.write_snapshot("json-run", "allocations_20240101T000000.json", "[]");
    let service = workspace.service(&["csv-run", "json-run"]);

    for scenario in ["csv-run", "json-run"] {
        let response = service
            .allocations(scenario, AllocationFilters::default())
            .expect("empty rollup");
        let payload = serde_json::to_value(&response).expect("serialize");
        assert_eq!(payload["summary"]["total_units"], json!(0.0), "{scenario}");
        assert_eq!(payload["summary"]["zones"], json!([]), "{scenario}");
        assert_eq!(
            payload["meta"]["time_range"],
            json!({"start": null, "end": null}),
            "{scenario}"
        );
    }
}

#[test]
fn integration_json_snapshot_rows_follow_csv_semantics() {
    let workspace = IsolatedWorkspace::new("json");
    workspace.write_snapshot(
        "surge",
        "allocations_20240601T000000.json",
        &serde_json::to_string(&json!([
            {"timestamp": "t1", "scenario": "surge", "zone_id": "Z-ALFA", "zone_name": "Alfa Flats",
             "impact_level": "Severe", "allocation_mode": "crisis", "river_level_pred": 6.2,
             "global_pf": "0.8", "pf_zone": null, "vulnerability": 0.9,
             "is_critical_infra": 1, "units_allocated": 30},
            {"timestamp": "t1", "scenario": "surge", "zone_id": "Z-BRAVO", "zone_name": "Bravo z-alfa annex",
             "impact_level": "Moderate", "allocation_mode": "crisis",
             "is_critical_infra": "no", "units_allocated": "7.5"},
            {"timestamp": "t1", "scenario": "surge", "zone_id": "Z-CHARLIE", "zone_name": "Charlie",
             "impact_level": "Low", "allocation_mode": "crisis",
             "is_critical_infra": false, "units_allocated": -2}
        ]))
        .expect("encode json snapshot"),
    );
    let service = workspace.service(&["surge"]);

    let response = service
        .allocations(
            "surge",
            AllocationFilters {
                zone: Some("Z-ALFA".to_string()),
                ..AllocationFilters::default()
            },
        )
        .expect("zone filter");
    let zones: Vec<&str> = response
        .data
        .iter()
        .map(|record| record.zone_id.as_str())
        .collect();
    assert_eq!(zones, vec!["Z-ALFA", "Z-BRAVO"]);
    assert!(response.data[0].is_critical_infra);
    assert_eq!(response.data[0].global_pf, Some(0.8));
    assert_eq!(response.data[1].units_allocated, 7.5);

    let all = service
        .allocations("surge", AllocationFilters::default())
        .expect("all rows");
    assert_eq!(all.data[2].units_allocated, 0.0);
    assert_eq!(all.summary.totals.total_units, 37.5);

    let critical = service
        .allocations(
            "surge",
            AllocationFilters {
                critical_only: true,
                ..AllocationFilters::default()
            },
        )
        .expect("critical rows");
    assert!(critical.data.iter().all(|record| record.is_critical_infra));
    assert_eq!(critical.data.len(), 1);
}

#[test]
fn integration_missing_scenario_and_unpopulated_results_fail_distinctly() {
    let workspace = IsolatedWorkspace::new("not-found");
    let service = workspace.service(&["never-run"]);

    let missing = service
        .allocations("absent", AllocationFilters::default())
        .expect_err("absent scenario");
    assert!(matches!(missing, AllocationServiceError::ScenarioNotFound(_)));

    let unpopulated = service
        .allocations("never-run", AllocationFilters::default())
        .expect_err("unpopulated results dir");
    assert!(matches!(
        unpopulated,
        AllocationServiceError::SnapshotNotFound { .. }
    ));

    let listing = serde_json::to_value(service.list_scenarios()).expect("listing json");
    assert_eq!(listing[0]["name"], "never-run");
    assert_eq!(listing[0]["latest_allocation_file"], Value::Null);
    assert!(workspace.root().join("scenarios.toml").exists());
}
