//! Valuesmith CLI - assemble Helm command lines from nested value overrides

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod charts;
mod commands;
mod config;
mod error;
mod exit_codes;
mod helm;

use config::{ConfigOverrides, PluginConfig};
use error::Result;

#[derive(Parser)]
#[command(name = "valuesmith")]
#[command(author = "Valuesmith Contributors")]
#[command(version)]
#[command(about = "Assemble Helm command lines from nested value overrides", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: valuesmith.yaml)
    #[arg(short, long, global = true, env = "VALUESMITH_CONFIG")]
    config: Option<PathBuf>,

    /// Release name (overrides the configuration file)
    #[arg(long, global = true)]
    release_name: Option<String>,

    /// Target namespace (overrides the configuration file)
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Chart version for packaging (overrides the configuration file)
    #[arg(long, global = true)]
    chart_version: Option<String>,

    /// App version for packaging (overrides the configuration file)
    #[arg(long, global = true)]
    app_version: Option<String>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the --set/--set-string/--set-file/--values options for the configured overrides
    Options,

    /// Print the Helm command for every chart (e.g. `command upgrade --install`)
    Command {
        /// Helm action followed by any extra Helm flags
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        action: Vec<String>,
    },

    /// Merge overrides into each chart's values.yaml and print its package command
    Package,

    /// Print the flat assignments of a YAML or JSON values document
    Encode {
        /// Document to encode
        file: PathBuf,
    },
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "valuesmith=debug,valuesmith_core=debug"
    } else {
        "valuesmith=info,valuesmith_core=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let overrides = ConfigOverrides {
        release_name: cli.release_name,
        namespace: cli.namespace,
        chart_version: cli.chart_version,
        app_version: cli.app_version,
    };
    let config_path = cli.config;
    let load_config = move || -> Result<PluginConfig> {
        Ok(PluginConfig::load(config_path.as_deref())?.with_overrides(overrides))
    };

    match cli.command {
        Commands::Options => commands::options::run(&load_config()?),
        Commands::Command { action } => {
            let (action, extra) = commands::command::split_action(&action);
            commands::command::run(&load_config()?, action, extra)
        }
        Commands::Package => commands::package::run(&load_config()?),
        Commands::Encode { file } => commands::encode::run(&file),
    }
}
