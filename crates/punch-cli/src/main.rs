use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use punch_cli::commands::{create, list, report, show, start, status, stop};
use punch_cli::{Cli, Commands, Config};
use punch_db::Store;

/// Load config and open the store, ensuring the parent directory exists.
fn open_store(config_path: Option<&Path>) -> Result<(Store, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let store = Store::open(&config.database_path).context("failed to open store")?;
    Ok((store, config))
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

    let mut stdout = std::io::stdout();

    match &cli.command {
        Some(Commands::Create { title }) => {
            let (mut store, _config) = open_store(cli.config.as_deref())?;
            create::run(&mut stdout, &mut store, title)?;
        }
        Some(Commands::Start { title }) => {
            let (mut store, _config) = open_store(cli.config.as_deref())?;
            start::run(&mut stdout, &mut store, title)?;
        }
        Some(Commands::Stop { title }) => {
            let (mut store, _config) = open_store(cli.config.as_deref())?;
            stop::run(&mut stdout, &mut store, title)?;
        }
        Some(Commands::List) => {
            let (store, _config) = open_store(cli.config.as_deref())?;
            list::run(&mut stdout, &store)?;
        }
        Some(Commands::Status) => {
            let (store, _config) = open_store(cli.config.as_deref())?;
            status::run(&mut stdout, &store)?;
        }
        Some(Commands::Show { title }) => {
            let (store, _config) = open_store(cli.config.as_deref())?;
            show::run(&mut stdout, &store, title)?;
        }
        Some(Commands::Report {
            date,
            from,
            to,
            json,
        }) => {
            let (store, _config) = open_store(cli.config.as_deref())?;
            let dates = match (date, from, to) {
                (Some(day), _, _) => vec![*day],
                (None, Some(from), Some(to)) => report::date_range(*from, *to),
                _ => vec![Local::now().date_naive()],
            };
            report::run(&mut stdout, &store, &dates, *json)?;
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
