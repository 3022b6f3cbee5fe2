//! ChatRelay CLI — the main entry point.
//!
//! Commands:
//! - `serve`    — Start the HTTP relay
//! - `doctor`   — Check config and upstream reachability
//! - `onboard`  — Write a default config file
//! - `config`   — Print the effective configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "chatrelay",
    about = "ChatRelay — relays chat messages to a hosted language model",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP relay server
    Serve {
        /// Override the listening port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the listening host
        #[arg(long)]
        host: Option<String>,

        /// Override the upstream inference URL
        #[arg(short, long)]
        upstream: Option<String>,
    },

    /// Diagnose configuration and upstream health
    Doctor,

    /// Write the default configuration file
    Onboard,

    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve {
            port,
            host,
            upstream,
        } => commands::serve::run(port, host, upstream).await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Config => commands::config_cmd::show().await?,
    }

    Ok(())
}
