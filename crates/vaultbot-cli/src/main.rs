//! `vaultbot` -- Telegram capture/query bot for a markdown vault.
//!
//! Subcommands:
//!
//! - `vaultbot run` -- Start the bot (long polling until Ctrl-C).
//! - `vaultbot check-config` -- Load and validate the configuration.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;

use vaultbot_engine::HttpQueryEngine;
use vaultbot_telegram::{TelegramChannel, TelegramClient};
use vaultbot_types::Config;

mod bot;

/// Telegram capture/query bot CLI.
#[derive(Parser)]
#[command(name = "vaultbot", about = "Telegram capture/query bot for a markdown vault", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Run {
        /// Config file path (defaults to ~/.vaultbot/config.json).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Load and validate the configuration, then exit.
    CheckConfig {
        /// Config file path (defaults to ~/.vaultbot/config.json).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let path = path.unwrap_or_else(Config::default_path);
    let config = Config::load(&path)
        .map_err(|e| anyhow::anyhow!("could not load config from {}: {e}", path.display()))?;
    config.validate()?;
    Ok(config)
}

async fn run(config: Config) -> anyhow::Result<()> {
    info!(
        user_id = config.telegram.allowed_user_id,
        vault = %config.vault.path.display(),
        inbox = %config.vault.inbox_folder,
        "starting vaultbot"
    );

    let client = Arc::new(TelegramClient::new(&config.telegram.token));
    let engine = Arc::new(HttpQueryEngine::new(config.engine.endpoint.clone()));
    let bot = Arc::new(bot::Bot::new(&config, Arc::clone(&client), engine));

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            signal_cancel.cancel();
        }
    });

    let channel = TelegramChannel::new(client);
    channel.run(bot, cancel).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    match cli.command {
        Commands::Run { config } => {
            let config = load_config(config)?;
            run(config).await?;
        }
        Commands::CheckConfig { config } => {
            let config = load_config(config)?;
            println!("configuration OK");
            println!("  user:   {}", config.telegram.allowed_user_id);
            println!("  vault:  {}", config.vault.path.display());
            println!("  inbox:  {}", config.vault.inbox_folder);
            println!("  engine: {}", config.engine.endpoint);
        }
    }

    Ok(())
}
