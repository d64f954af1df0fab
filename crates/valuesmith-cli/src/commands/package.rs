//! Package command - merge overrides into values.yaml and print package commands

use console::style;
use valuesmith_core::rewrite_values_file;

use crate::charts::find_chart_directories;
use crate::config::PluginConfig;
use crate::error::Result;
use crate::helm::HelmCommand;

pub fn run(config: &PluginConfig) -> Result<()> {
    let charts = find_chart_directories(&config.chart_directory, &config.excludes)?;
    for chart in &charts {
        if rewrite_values_file(chart, &config.values)? {
            eprintln!(
                "{} {} values.yaml with overrides",
                style("Merged").green().bold(),
                chart.display()
            );
        }
        println!("{}", HelmCommand::package(config, chart));
    }

    Ok(())
}
