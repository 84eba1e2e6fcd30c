//! Lagwatch CLI
//!
//! Operations command-line interface for the data-pipeline platform and the
//! systems around it.

mod catalog;
mod commands;
mod config;
mod warehouse;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lagwatch")]
#[command(about = "Data pipeline operations CLI", long_about = None)]
struct Cli {
    /// Platform API root
    #[arg(
        long,
        global = true,
        env = "PLATFORM_API_URL",
        default_value = "https://us.hevodata.com/api/public/v2.0"
    )]
    api_url: String,

    /// Platform API token (sent as Basic auth)
    #[arg(long, global = true, env = "PLATFORM_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lagwatch_cli=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        api_url: cli.api_url,
        api_token: cli.token,
        timeout: Duration::from_secs(cli.timeout),
    };

    handle_command(cli.command, &config).await
}
