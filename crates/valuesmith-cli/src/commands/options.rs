//! Options command - print the Helm value options for the configured overrides

use crate::config::PluginConfig;
use crate::error::Result;

pub fn run(config: &PluginConfig) -> Result<()> {
    let options = config.values.values_options()?;
    println!("{}", options.trim_start());
    Ok(())
}
