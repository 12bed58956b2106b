mod agent;
mod commands;
mod config;
mod delegate;
mod knowledge;
mod llm;
mod platform;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::agent::Assistant;
use crate::config::Config;
use crate::delegate::AiDelegate;
use crate::knowledge::GOJO_HOST;
use crate::llm::LlmClient;
use crate::platform::telegram;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gojobot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Secrets usually come from a .env file next to the binary
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!("Failed to load .env: {}", e);
        }
    }

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Provider: {}", config.llm.provider);
    info!("  Model: {}", config.llm.model);
    info!("  Endpoint: {}", config.llm.effective_base_url());
    if config.llm.has_api_key() {
        info!("  API key: SET");
    } else if config.llm.requires_api_key() {
        warn!("  API key: MISSING (set GROQ_API_KEY); AI replies will fall back to an apology");
    }

    if config.telegram.bot_token.trim().is_empty() {
        anyhow::bail!("No Telegram bot token configured (set BOT_TOKEN or [telegram] bot_token)");
    }

    let bot = teloxide::Bot::new(config.telegram.bot_token.trim());

    telegram::register_commands(&bot, &config.telegram.menu_languages).await;
    let bot_username = telegram::fetch_username(&bot).await;

    let client = LlmClient::new(&config.llm).context("Failed to build HTTP client")?;
    let delegate = AiDelegate::new(Arc::new(client), &GOJO_HOST, &config.llm);
    let assistant = Arc::new(Assistant::new(&GOJO_HOST, delegate, bot_username));

    info!("Bot is starting...");
    telegram::run(assistant, bot).await?;

    Ok(())
}
