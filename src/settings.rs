use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::mapper::NullPolicy;
use crate::schema::AmbiguityPolicy;

/// Tunables for mapping and logging.
///
/// Every key is optional. Values come from an optional file and are then
/// overridden by `OQLMAP_*` environment variables, e.g.
/// `OQLMAP_NULL_POLICY=reject`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub null_policy: NullPolicy,
    pub ambiguity_policy: AmbiguityPolicy,
    /// Row limit applied when an operation does not give one.
    pub default_amount: Option<u64>,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            null_policy: NullPolicy::Skip,
            ambiguity_policy: AmbiguityPolicy::Reject,
            default_amount: None,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        let config = builder
            .add_source(Environment::with_prefix("OQLMAP").try_parsing(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }
    /// Reads settings from TOML text only, ignoring the environment.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
