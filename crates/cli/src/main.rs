use clap::Parser;
use std::path::PathBuf;
use warmstart_config::ConfigLoader;

mod commands;
mod execute;

use commands::Commands;

#[derive(Parser)]
#[command(name = "warmstart")]
#[command(about = "Warm the page cache for applications as they launch", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (JSON); defaults to $WARMSTART_CONFIG, then built-in defaults
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the number of preload workers
    #[arg(long, global = true)]
    workers: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    warmstart_utils::tracing::init()
        .map_err(|e| eyre::eyre!("failed to initialise logging: {e}"))?;

    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = cli.config {
        loader = loader.path(path);
    }
    let (mut config, source) = loader.load()?;

    if let Some(workers) = cli.workers {
        config.workers = workers;
        config.validate()?;
    }
    tracing::debug!(?source, applications = config.applications.len(), "configuration loaded");

    // Default behaviour is the launch-trigger loop on the configured source
    let command = cli.command.unwrap_or(Commands::Run { stdin: false });
    command.execute(&config)
}
