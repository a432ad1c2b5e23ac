//! Command-line surface of the Tide allocation gateway.

mod bootstrap_helpers;
mod cli_args;
mod startup_dispatch;

pub use bootstrap_helpers::init_tracing;
pub use cli_args::Cli;
pub use startup_dispatch::{render_one_shot_report, run_cli};
