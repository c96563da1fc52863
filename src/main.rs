mod commands;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vows_core::SiteConfig;

#[derive(Parser)]
#[command(name = "vows")]
#[command(about = "Manage the vows wedding site: config, seed data, RSVP export, calendars")]
struct Cli {
    /// Config file to use instead of ~/.config/vows/config.toml
    #[arg(long, global = true, env = "VOWS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a commented default config file
    Init,
    /// Fill the database with the default schedule, registry and a sample RSVP
    Seed,
    /// Export all RSVPs as CSV
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print an event as an .ics calendar file
    Ics {
        event_id: String,
    },
    /// Create or update events from an .ics file (matched by UID)
    Import {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init => commands::init::run(config_path),
        Commands::Seed => commands::seed::run(&load(config_path)?).await,
        Commands::Export { output } => {
            commands::export::run(&load(config_path)?, output.as_deref()).await
        }
        Commands::Ics { event_id } => commands::ics::run(&load(config_path)?, &event_id).await,
        Commands::Import { file } => commands::import::run(&load(config_path)?, &file).await,
    }
}

fn load(path: Option<&Path>) -> Result<SiteConfig> {
    Ok(SiteConfig::load(path)?)
}
