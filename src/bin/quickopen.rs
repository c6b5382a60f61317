//! CLI binary for quickopen.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use quickopen::{AppConfig, QuickOpenServer};
use quickopen_route::{ExaProvider, Orchestrator, classify};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Quick Open: turn a free-text query into the one page you meant.
#[derive(Parser)]
#[command(name = "quickopen", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Run the HTTP endpoint until Ctrl-C.
    Serve,

    /// Resolve a query and print the destination URL.
    Resolve {
        /// Print the full resolution report as JSON.
        #[arg(long)]
        json: bool,

        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,
    },

    /// Print the routing plan for a query without searching.
    Classify {
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quickopen=info,quickopen_route=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Resolve { json, query } => resolve(config, &query.join(" "), json).await,
        Command::Classify { query } => {
            let plan = classify(&query.join(" "));
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    if config.provider.api_key.is_none() {
        tracing::warn!("no provider API key configured; every search will use the fallback URL");
    }
    let server = QuickOpenServer::start(&config)
        .await
        .context("failed to start server")?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    info!(addr = %server.addr(), "shutting down");
    server.shutdown();
    Ok(())
}

async fn resolve(config: AppConfig, query: &str, json: bool) -> anyhow::Result<()> {
    config.validate()?;
    let provider = ExaProvider::new(config.provider_config()?)?;
    let orchestrator = Orchestrator::new(provider, config.routing.clone())?;

    let resolution = orchestrator.resolve_query(query).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
    } else {
        println!("{}", resolution.url);
    }
    Ok(())
}
