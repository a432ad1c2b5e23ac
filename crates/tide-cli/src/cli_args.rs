use std::path::PathBuf;

use clap::{ArgAction, Parser};

fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "tide",
    about = "Read-only HTTP service over flood-response allocation snapshots",
    version
)]
/// Public struct `Cli` used across Tide components.
pub struct Cli {
    #[arg(
        long = "scenarios-config",
        env = "TIDE_SCENARIOS_CONFIG",
        default_value = "config/scenarios.toml",
        help = "Scenario configuration document (.toml or .json). Relative result directories resolve against its parent directory."
    )]
    pub scenarios_config: PathBuf,

    #[arg(
        long,
        env = "TIDE_GATEWAY_BIND",
        default_value = "127.0.0.1:8787",
        help = "Socket address the HTTP gateway listens on"
    )]
    pub bind: String,

    #[arg(
        long = "snapshot-cache",
        env = "TIDE_SNAPSHOT_CACHE",
        default_value_t = false,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "Keep the newest parsed allocation snapshot per scenario in memory while its length and mtime are unchanged"
    )]
    pub snapshot_cache: bool,

    #[arg(
        long = "list-scenarios",
        default_value_t = false,
        conflicts_with = "inspect_allocations",
        help = "Print the scenario listing as JSON and exit"
    )]
    pub list_scenarios: bool,

    #[arg(
        long = "inspect-allocations",
        value_name = "SCENARIO",
        help = "Print the allocation rollup of one scenario as JSON and exit"
    )]
    pub inspect_allocations: Option<String>,

    #[arg(
        long = "inspect-latest",
        default_value_t = false,
        requires = "inspect_allocations",
        help = "Restrict --inspect-allocations to the newest timestamp of the snapshot"
    )]
    pub inspect_latest: bool,

    #[arg(
        long = "inspect-zone",
        requires = "inspect_allocations",
        help = "Restrict --inspect-allocations to a zone id or a zone name substring"
    )]
    pub inspect_zone: Option<String>,

    #[arg(
        long = "inspect-limit",
        requires = "inspect_allocations",
        value_parser = parse_positive_usize,
        help = "Keep only the trailing N records of --inspect-allocations"
    )]
    pub inspect_limit: Option<usize>,
}
