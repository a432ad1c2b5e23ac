use super::*;

pub(super) async fn handle_gateway_status(
    State(state): State<Arc<GatewayServerState>>,
) -> Response {
    state.record_request();
    let service = state.service();
    let registry = service.registry();
    (
        StatusCode::OK,
        Json(json!({
            "service": "tide-gateway",
            "version": env!("CARGO_PKG_VERSION"),
            "bind": state.config.bind,
            "scenario_count": registry.len(),
            "scenarios_config": registry.config_path().map(|path| path.display().to_string()),
            "results_root": registry.catalog().results_root().display().to_string(),
            "snapshot_cache_enabled": service.snapshot_cache_enabled(),
            "cached_snapshots": service.cached_snapshots(),
            "started_unix_ms": state.started_unix_ms,
            "generated_unix_ms": current_unix_timestamp_ms(),
            "requests_served": state.requests_served(),
            "endpoints": {
                "scenarios": SCENARIOS_ENDPOINT,
                "scenario_allocations": SCENARIO_ALLOCATIONS_ENDPOINT,
                "scenario_summary": SCENARIO_SUMMARY_ENDPOINT,
                "gateway_status": GATEWAY_STATUS_ENDPOINT,
            },
        })),
    )
        .into_response()
}
