//! Gateway server bootstrap and router wiring.

use super::*;

/// Binds the configured address and serves the scenario API until ctrl-c.
///
/// On unix a SIGHUP re-reads the scenario config; a broken config keeps the
/// previous catalog in place.
pub async fn run_gateway_server(
    config: GatewayServerConfig,
    registry: Arc<ScenarioRegistry>,
) -> Result<()> {
    let bind_addr = config
        .bind
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid --bind '{}'", config.bind))?;

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind tide gateway on {bind_addr}"))?;
    let local_addr = listener
        .local_addr()
        .context("failed to resolve bound gateway address")?;

    tracing::info!(
        addr = %local_addr,
        scenarios = registry.len(),
        snapshot_cache = config.snapshot_cache,
        "tide gateway listening"
    );

    #[cfg(unix)]
    let reload_task = spawn_config_reload_on_hangup(Arc::clone(&registry))?;

    let state = Arc::new(GatewayServerState::new(config, registry));
    let app = build_gateway_router(state);
    let serve_result = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;

    #[cfg(unix)]
    reload_task.abort();

    serve_result.context("tide gateway exited unexpectedly")?;
    tracing::info!("tide gateway stopped");
    Ok(())
}

#[cfg(unix)]
fn spawn_config_reload_on_hangup(
    registry: Arc<ScenarioRegistry>,
) -> Result<tokio::task::JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangups =
        signal(SignalKind::hangup()).context("failed to install SIGHUP handler")?;
    Ok(tokio::spawn(async move {
        while hangups.recv().await.is_some() {
            if let Err(error) = registry.reload() {
                tracing::warn!(%error, "scenario config reload failed; keeping previous catalog");
            }
        }
    }))
}

pub fn build_gateway_router(state: Arc<GatewayServerState>) -> Router {
    Router::new()
        .route(SCENARIOS_ENDPOINT, get(handle_scenarios_list))
        .route(SCENARIO_ALLOCATIONS_ENDPOINT, get(handle_scenario_allocations))
        .route(SCENARIO_SUMMARY_ENDPOINT, get(handle_scenario_summary))
        .route(GATEWAY_STATUS_ENDPOINT, get(handle_gateway_status))
        .with_state(state)
}
