use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Installs the process-wide subscriber. `RUST_LOG` overrides the INFO default.
pub fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
