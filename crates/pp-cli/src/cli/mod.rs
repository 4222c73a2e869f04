//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pp_core::config::AppConfig;
use pp_core::feed::DEFAULT_FEED_PAGE_SIZE;

use crate::bootstrap::{self, wiring};

mod commands;
mod terminal;

#[derive(Parser)]
#[command(name = "pixelpost")]
#[command(version)]
#[command(about = "PixelPost sign-in and feed from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: <config dir>/pixelpost/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in with a username, email or phone number
    SignIn {
        /// Identifier to prefill; prompted for when omitted
        #[arg(short, long)]
        identifier: Option<String>,
    },
    /// Sign out and forget the saved password
    SignOut,
    /// Print the newest posts
    Feed {
        /// Number of posts to print
        #[arg(short, long, default_value_t = DEFAULT_FEED_PAGE_SIZE)]
        limit: usize,
    },
}

/// Parse arguments, bootstrap and run the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::resolve_config(cli.config.as_deref())?;
    let log_dir = wiring::resolve_log_dir(&config)?;
    bootstrap::init_tracing_subscriber(&log_dir).context("Failed to initialize tracing")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(dispatch(cli.command, &config))
}

async fn dispatch(command: Commands, config: &AppConfig) -> Result<()> {
    let wired = bootstrap::wire_dependencies(config).context("Failed to wire dependencies")?;
    match command {
        Commands::SignIn { identifier } => commands::sign_in::run(wired, identifier).await,
        Commands::SignOut => commands::sign_out::run(&wired.app).await,
        Commands::Feed { limit } => commands::feed::run(&wired.app, limit).await,
    }
}
