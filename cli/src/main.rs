mod report;
mod tui;

use anyhow::Result;
use clap::Parser;
use meterdash_core::Settings;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "meterdash")]
#[command(about = "Electricity meter balance dashboard", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data file path or http(s) URL
    #[arg(long, global = true)]
    data: Option<String>,

    /// Refresh interval in milliseconds
    #[arg(short = 'i', long, global = true)]
    interval: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the auto-refreshing terminal dashboard
    Dashboard,
    /// Fetch once and print the metrics and readings
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let dashboard = !matches!(cli.command, Some(Commands::Show));
    // The dashboard owns the terminal, so its logs go to a file.
    let log_file = if dashboard { default_log_file() } else { None };
    setup_logging(cli.debug, log_file)?;

    let mut settings = Settings::load(cli.config.as_ref())?;
    settings.merge_overrides(cli.data, cli.interval);
    settings.validate();
    tracing::debug!(?settings, "settings loaded");

    match cli.command {
        Some(Commands::Show) => report::run(settings),
        Some(Commands::Dashboard) | None => tui::run(settings),
    }
}

fn default_log_file() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("meterdash").join("meterdash.log"))
}

fn setup_logging(debug: bool, log_file: Option<PathBuf>) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("meterdash=debug,meterdash_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("meterdash=info,meterdash_core=info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            registry
                .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}
