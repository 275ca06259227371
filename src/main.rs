mod clock;
mod config;
mod cursor;
mod error;
mod relay;
mod server;
mod telegram;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up TELEGRAM_* and PORT from a local .env, if any
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tgrelay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tgrelay.toml"));

    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded");
    info!("  Telegram API: {}", config.telegram.api_base_url);
    info!(
        "  Bot token: {}",
        if config.telegram.bot_token.is_empty() { "missing" } else { "set" }
    );
    if config.telegram.chat_id.is_empty() {
        warn!("TELEGRAM_CHAT_ID is not set; /send will be rejected by Telegram");
    }

    let state = AppState::new(&config)?;
    server::serve(&config, state).await?;

    Ok(())
}
