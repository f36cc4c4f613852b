//! CLI configuration using Figment.
//!
//! Sources in precedence order (later overrides earlier):
//! 1. Built-in defaults
//! 2. `.dynaform/config.{toml,yaml,yml,json}` in the working directory
//! 3. `dynaform.{toml,yaml,yml,json}` in the working directory
//! 4. `DYNAFORM_` environment variables
//! 5. Command line flags (applied by the caller)

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration parsing failed
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] figment::Error),
}

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Property bag given to descriptors whose type is not built in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTypePolicy {
    /// Shared attributes plus pass-through extras, like a placeholder bag
    #[default]
    Base,
    /// No property bag at all
    Empty,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub output: OutputFormat,
    #[serde(default)]
    pub unknown_types: UnknownTypePolicy,
}

/// Loads [`CliConfig`] fresh on every call.
pub struct ConfigProvider {
    root: PathBuf,
}

impl ConfigProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn load(&self) -> Result<CliConfig, ConfigError> {
        let config: CliConfig = self.build_figment().extract()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    fn build_figment(&self) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(CliConfig::default()));
        for path in self.discover() {
            trace!("Loading config file: {}", path.display());
            figment = figment.merge(load_file(&path));
        }
        figment.merge(Env::prefixed("DYNAFORM_"))
    }

    /// Existing config files, lowest precedence first.
    fn discover(&self) -> Vec<PathBuf> {
        let candidates = CONFIG_EXTENSIONS
            .iter()
            .map(|ext| self.root.join(".dynaform").join(format!("config.{ext}")))
            .chain(
                CONFIG_EXTENSIONS
                    .iter()
                    .map(|ext| self.root.join(format!("dynaform.{ext}"))),
            );
        candidates.filter(|path| path.is_file()).collect()
    }
}

fn load_file(path: &Path) -> Figment {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Figment::from(Toml::file(path)),
        Some("json") => Figment::from(Json::file(path)),
        _ => Figment::from(Yaml::file(path)),
    }
}
