use tracing_subscriber::EnvFilter;

use crate::error::{OqlError, Result};
use crate::settings::Settings;

/// Installs a global fmt subscriber. `RUST_LOG` wins over `level` when set.
pub fn init(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| OqlError::Config(format!("invalid log filter '{}': {}", level, e)))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| OqlError::Config(e.to_string()))
}

/// Installs the subscriber at the level named by `settings.log_level`.
pub fn init_from(settings: &Settings) -> Result<()> {
    init(&settings.log_level)
}
