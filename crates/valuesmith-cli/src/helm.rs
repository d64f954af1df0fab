//! Helm command-line assembly

use std::fmt;
use std::path::Path;

use crate::config::{PluginConfig, non_empty};
use crate::error::Result;

/// Actions whose first positional argument is a release name
const RELEASE_ACTIONS: &[&str] = &["install", "upgrade", "template"];

/// A Helm invocation as an ordered argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelmCommand {
    args: Vec<String>,
}

impl HelmCommand {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            args: vec![executable.into()],
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Command running `action` on a chart directory with the configured overrides
    ///
    /// `action` may hold several words (`upgrade --install`, `dependency build`)
    /// and `extra` is inserted right after it (`--dry-run`, `--strict`).
    pub fn for_chart(
        config: &PluginConfig,
        action: &[String],
        extra: &[String],
        chart_dir: &Path,
    ) -> Result<Self> {
        let mut command = Self::new(&config.helm_executable)
            .args(action.iter().cloned())
            .args(extra.iter().cloned());

        if takes_release(action) {
            command = match non_empty(config.release_name.as_deref()) {
                Some(name) => command.arg(name),
                None => command.arg("--generate-name"),
            };
        }

        command = command.arg(chart_dir.display().to_string());

        if let Some(namespace) = non_empty(config.namespace.as_deref()) {
            command = command.arg("-n").arg(namespace.to_lowercase());
        }
        if config.verbose {
            command = command.arg("--debug");
        }
        if let Some(path) = non_empty(config.registry_config.as_deref()) {
            command = command.arg(format!("--registry-config={}", path));
        }
        if let Some(path) = non_empty(config.repository_cache.as_deref()) {
            command = command.arg(format!("--repository-cache={}", path));
        }
        if let Some(path) = non_empty(config.repository_config.as_deref()) {
            command = command.arg(format!("--repository-config={}", path));
        }

        for fragment in config.values.fragments()? {
            command = command.arg(fragment.flag).arg(fragment.value);
        }

        Ok(command)
    }

    /// `helm package` for a chart directory
    pub fn package(config: &PluginConfig, chart_dir: &Path) -> Self {
        let mut command = Self::new(&config.helm_executable)
            .arg("package")
            .arg(chart_dir.display().to_string())
            .arg("-d")
            .arg(config.output_directory.display().to_string());

        if let Some(version) = non_empty(config.chart_version.as_deref()) {
            command = command.arg("--version").arg(version);
        }
        if let Some(version) = non_empty(config.app_version.as_deref()) {
            command = command.arg("--app-version").arg(version);
        }
        command
    }

    pub fn as_args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for HelmCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.args.join(" "))
    }
}

fn takes_release(action: &[String]) -> bool {
    action
        .first()
        .is_some_and(|verb| RELEASE_ACTIONS.contains(&verb.as_str()))
}
