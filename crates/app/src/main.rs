mod commands;
mod config;
mod dto;
mod readout;
mod state;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::Output;
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "yarn-weaver", version, about = "Load, check and play Yarn dialogue scripts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    /// Don't start the interactive player after loading
    #[arg(long, global = true)]
    no_play: bool,
    /// Use this config file instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Open a script file (path or file:// URI)
    Open { location: String },
    /// List recent files, or open one by its number
    Recent {
        #[arg(long)]
        open: Option<usize>,
    },
    /// Play the bundled tutorial script
    Sample,
    /// Compile and lint a script without opening it
    Check { location: String },
    /// Clear the recent-file history
    Forget,
    /// Show the active configuration, optionally writing it out
    Config {
        #[arg(long)]
        write: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "yarn_weaver=debug,weaver_core=debug,weaver_runner=debug,weaver_prefs=debug"
    } else {
        "yarn_weaver=info,weaver_core=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let out = Output {
        json: cli.json,
        interactive: !cli.no_play && !cli.json,
    };

    match cli.command {
        Command::Check { location } => {
            if !commands::check(&location, cli.json).await? {
                std::process::exit(1);
            }
            return Ok(());
        }
        Command::Config { write } => {
            println!("{}", toml::to_string_pretty(&config)?);
            if write {
                let path = cli
                    .config
                    .clone()
                    .or_else(Config::config_path)
                    .context("no config directory on this platform")?;
                config.save_to(&path)?;
                println!("Written to {}", path.display());
            }
            return Ok(());
        }
        _ => {}
    }

    let (mut weaver, mut validations) = state::open_weaver(&config)?;
    tracing::debug!(entries = weaver.history().len(), "history loaded");

    match cli.command {
        Command::Open { location } => {
            commands::open(&mut weaver, &mut validations, &location, &out).await?
        }
        Command::Recent { open: Some(index) } => {
            commands::open_recent(&mut weaver, &mut validations, index, &out).await?
        }
        Command::Recent { open: None } => commands::recent(&weaver, &out)?,
        Command::Sample => commands::sample(&mut weaver, &mut validations, &out).await?,
        Command::Forget => commands::forget(&mut weaver),
        Command::Check { .. } | Command::Config { .. } => {}
    }

    Ok(())
}
