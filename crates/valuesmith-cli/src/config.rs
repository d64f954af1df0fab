//! Plugin configuration
//!
//! Read from `valuesmith.yaml` in the working directory unless `--config`
//! points elsewhere. JSON files are accepted as well.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use valuesmith_core::ValueOverride;

use crate::error::{CliError, Result};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "valuesmith.yaml";

/// Build configuration for driving Helm
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    /// Root directory searched for charts
    pub chart_directory: PathBuf,

    /// Glob patterns of chart directories to skip
    #[serde(default)]
    pub excludes: Vec<String>,

    /// Helm executable, by name or path
    #[serde(default = "default_helm_executable")]
    pub helm_executable: String,

    /// Where packaged charts are written
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,

    #[serde(default)]
    pub release_name: Option<String>,

    #[serde(default)]
    pub namespace: Option<String>,

    /// Pass `--debug` to Helm
    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub chart_version: Option<String>,

    #[serde(default)]
    pub app_version: Option<String>,

    #[serde(default)]
    pub registry_config: Option<String>,

    #[serde(default)]
    pub repository_cache: Option<String>,

    #[serde(default)]
    pub repository_config: Option<String>,

    /// Value overrides applied to every chart
    #[serde(default)]
    pub values: ValueOverride,
}

fn default_helm_executable() -> String {
    "helm".to_string()
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("target").join("helm").join("repo")
}

/// Command-line values that take precedence over the configuration file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub release_name: Option<String>,
    pub namespace: Option<String>,
    pub chart_version: Option<String>,
    pub app_version: Option<String>,
}

impl PluginConfig {
    /// Load configuration from an explicit path or the default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        if !path.exists() {
            return Err(CliError::config_with_help(
                format!("configuration file not found: {}", path.display()),
                format!("Create {} or pass --config <file>", DEFAULT_CONFIG_FILE),
            ));
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)
            .map_err(|e| CliError::config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from YAML (or JSON) text
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Apply command-line values on top of the file configuration
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if overrides.release_name.is_some() {
            self.release_name = overrides.release_name;
        }
        if overrides.namespace.is_some() {
            self.namespace = overrides.namespace;
        }
        if overrides.chart_version.is_some() {
            self.chart_version = overrides.chart_version;
        }
        if overrides.app_version.is_some() {
            self.app_version = overrides.app_version;
        }
        self
    }
}

/// Filter out empty strings from optional settings
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
