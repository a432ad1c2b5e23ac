//! Scenario listing, allocation rollup and summary handlers.
//!
//! Snapshot reads are blocking filesystem work and run on the blocking pool.

use super::*;

async fn run_blocking<T, F>(state: &Arc<GatewayServerState>, work: F) -> Result<T, GatewayApiError>
where
    T: Send + 'static,
    F: FnOnce(&AllocationService) -> Result<T, AllocationServiceError> + Send + 'static,
{
    let state = Arc::clone(state);
    match tokio::task::spawn_blocking(move || work(state.service())).await {
        Ok(result) => result.map_err(GatewayApiError::from),
        Err(error) => {
            tracing::error!(%error, "snapshot worker task failed");
            Err(GatewayApiError::internal(
                "worker_failed",
                format!("snapshot worker task failed: {error}"),
            ))
        }
    }
}

pub(super) async fn handle_scenarios_list(
    State(state): State<Arc<GatewayServerState>>,
) -> Response {
    state.record_request();
    let listing = run_blocking(&state, |service| Ok(service.list_scenarios())).await;
    match listing {
        Ok(scenarios) => (
            StatusCode::OK,
            Json(json!({
                "generated_unix_ms": current_unix_timestamp_ms(),
                "scenario_count": scenarios.len(),
                "scenarios": scenarios,
            })),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}

pub(super) async fn handle_scenario_allocations(
    State(state): State<Arc<GatewayServerState>>,
    RoutePath(name): RoutePath<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    state.record_request();
    let filters = pairs.into_iter().collect::<AllocationsQuery>().into_filters();
    match run_blocking(&state, move |service| service.allocations(&name, filters)).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(super) async fn handle_scenario_summary(
    State(state): State<Arc<GatewayServerState>>,
    RoutePath(name): RoutePath<String>,
) -> Response {
    state.record_request();
    match run_blocking(&state, move |service| service.latest_summary(&name)).await {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(error) => error.into_response(),
    }
}
