use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stint_cli::commands::{log, start, stats, treats};
use stint_cli::{Cli, Commands, Config};

/// Load config and open the store, ensuring the data directory and its
/// files exist.
fn open_store(config_path: Option<&Path>) -> Result<stint_store::Store> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    stint_store::Store::open(&config.data_dir)
        .with_context(|| format!("failed to open data directory {}", config.data_dir.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Start { task, notes }) => {
            let store = open_store(cli.config.as_deref())?;
            start::run(&store, task.as_deref(), notes.as_deref())?;
        }
        Some(Commands::Stats {
            weeks,
            averages,
            json,
        }) => {
            let store = open_store(cli.config.as_deref())?;
            stats::run(&mut std::io::stdout(), &store, *weeks, *averages, *json)?;
        }
        Some(Commands::Treats { redeem }) => {
            let store = open_store(cli.config.as_deref())?;
            treats::run(&mut std::io::stdout(), &store, *redeem)?;
        }
        Some(Commands::Log {
            date,
            from,
            to,
            json,
        }) => {
            let store = open_store(cli.config.as_deref())?;
            log::run(
                &mut std::io::stdout(),
                &store,
                date.as_deref(),
                from.as_deref(),
                to.as_deref(),
                *json,
            )?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
