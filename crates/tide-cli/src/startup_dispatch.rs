//! Mode selection between the long-running gateway and the one-shot reports.

use std::sync::Arc;

use anyhow::{Context, Result};
use tide_allocations::{AllocationFilters, AllocationService};
use tide_gateway::{run_gateway_server, GatewayServerConfig};
use tide_scenarios::ScenarioRegistry;

use crate::cli_args::Cli;

pub async fn run_cli(cli: Cli) -> Result<()> {
    let registry = Arc::new(
        ScenarioRegistry::load(&cli.scenarios_config).with_context(|| {
            format!(
                "failed to load scenario config {}",
                cli.scenarios_config.display()
            )
        })?,
    );

    if cli.list_scenarios || cli.inspect_allocations.is_some() {
        let service =
            AllocationService::new(Arc::clone(&registry)).with_snapshot_cache(cli.snapshot_cache);
        println!("{}", render_one_shot_report(&cli, &service)?);
        return Ok(());
    }

    run_gateway_server(
        GatewayServerConfig {
            bind: cli.bind,
            snapshot_cache: cli.snapshot_cache,
        },
        registry,
    )
    .await
}

/// Renders the JSON payload of `--list-scenarios` or `--inspect-allocations`.
pub fn render_one_shot_report(cli: &Cli, service: &AllocationService) -> Result<String> {
    let payload = match cli.inspect_allocations.as_deref() {
        Some(scenario) => {
            let filters = inspect_filters(cli);
            let response = service
                .allocations(scenario, filters)
                .with_context(|| format!("failed to inspect allocations of '{scenario}'"))?;
            serde_json::to_value(response).context("failed to encode allocation rollup")?
        }
        None => serde_json::to_value(service.list_scenarios())
            .context("failed to encode scenario listing")?,
    };
    serde_json::to_string_pretty(&payload).context("failed to render report")
}

fn inspect_filters(cli: &Cli) -> AllocationFilters {
    AllocationFilters {
        latest: cli.inspect_latest,
        zone: cli
            .inspect_zone
            .as_deref()
            .map(str::trim)
            .filter(|zone| !zone.is_empty())
            .map(str::to_string),
        limit: cli.inspect_limit,
        ..AllocationFilters::default()
    }
}
