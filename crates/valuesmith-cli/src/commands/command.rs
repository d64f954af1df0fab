//! Command command - print the Helm invocation for every discovered chart

use crate::charts::find_chart_directories;
use crate::config::PluginConfig;
use crate::error::{CliError, Result};
use crate::helm::HelmCommand;

/// Split `upgrade --install --dry-run` into the action words and the flags
/// that follow them
pub fn split_action(words: &[String]) -> (&[String], &[String]) {
    let end = words
        .iter()
        .position(|word| word.starts_with('-'))
        .unwrap_or(words.len());
    words.split_at(end)
}

pub fn run(config: &PluginConfig, action: &[String], extra: &[String]) -> Result<()> {
    if action.first().is_some_and(|verb| verb == "package") {
        return Err(CliError::usage("use 'valuesmith package' to package charts"));
    }

    let charts = find_chart_directories(&config.chart_directory, &config.excludes)?;
    for chart in &charts {
        let command = HelmCommand::for_chart(config, action, extra, chart)?;
        tracing::debug!(
            chart = %chart.display(),
            args = command.as_args().len(),
            "assembled helm command"
        );
        println!("{}", command);
    }

    Ok(())
}
