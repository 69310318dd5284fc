//! Log subscriber setup.

use crate::NodeConfig;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Filter for the node's subscriber. A `RUST_LOG` value wins over the
/// configured level.
pub fn filter_for(log_level: &str, rust_log: Option<&str>) -> anyhow::Result<EnvFilter> {
    match rust_log.and_then(|directives| EnvFilter::try_new(directives).ok()) {
        Some(filter) => Ok(filter),
        None => Ok(EnvFilter::try_new(log_level)?),
    }
}

/// Install the global subscriber at the level `config` names.
pub fn init_tracing(config: &NodeConfig) -> anyhow::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = filter_for(&config.log_level, rust_log.as_deref())?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
