//! Layered application configuration.
//!
//! Sources, lowest precedence first: built-in defaults, the YAML file given
//! with `--config`, `VISITORGEN__*` environment variables (`__` separates
//! nesting levels, e.g. `VISITORGEN__GENERATOR__PARALLEL=true`), then CLI flags.

use std::path::{Path, PathBuf};

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use visitorgen::GeneratorConfig;

use crate::logging::LoggingConfig;

pub const ENV_PREFIX: &str = "VISITORGEN__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub logging: LoggingConfig,
    /// Directory generated artifacts are written to.
    pub output_dir: PathBuf,
    /// Glob patterns excluded from source discovery.
    pub exclude: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            logging: LoggingConfig::default(),
            output_dir: PathBuf::from("generated"),
            exclude: Vec::new(),
        }
    }
}

impl AppConfig {
    /// # Errors
    /// Fails when the file does not exist, a layer does not deserialize, or
    /// the generator settings are invalid.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Self = figment
            .extract()
            .context("failed to load visitorgen configuration")?;
        config
            .generator
            .validate()
            .context("invalid generator configuration")?;
        Ok(config)
    }

    pub fn apply_cli_overrides(&mut self, verbose: u8) {
        if let Some(level) = LoggingConfig::verbosity_level(verbose) {
            level.clone_into(&mut self.logging.level);
        }
    }
}
