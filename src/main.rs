//! # Main Entry Point
//!
//! Runs a single invocation of the code-distribution bot and exits:
//! - Domain: Configuration and Types
//! - Infrastructure: Telegram Bot API, Redis
//! - Application: Driver, Processor, Router, State, Logging
//! - Interface: Command Handlers
//!
//! Meant to be triggered periodically by an external scheduler, one run at a time.

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::driver::InvocationDriver;
use crate::application::state::StateRepository;
use crate::domain::config::{AppConfig, Credentials};
use crate::infrastructure::redis_store::RedisStore;
use crate::infrastructure::telegram::TelegramService;

#[derive(Parser, Debug)]
#[command(version, about = "Polls Telegram once and hands out single-use codes in one forum topic")]
struct Args {
    /// Telegram Bot API token
    #[arg(long = "token", env = "TELEGRAM_API_TOKEN", hide_env_values = true)]
    api_token: String,

    /// Redis connection URL
    #[arg(long, env = "REDIS_URL", hide_env_values = true)]
    redis_url: String,

    /// Optional YAML file with tunables (timeouts, key names, log directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Arguments and Configuration
    let args = Args::parse();
    let credentials = Credentials {
        api_token: args.api_token,
        redis_url: args.redis_url,
    };
    let config = AppConfig::load(args.config.as_deref())?;

    // 2. Logging Setup
    let _guard = application::logging::init(&config.logging)?;
    tracing::debug!("Starting with {:?}", credentials);

    // 3. Initialize Infrastructure
    let chat = Arc::new(TelegramService::new(&credentials.api_token, &config.telegram)?);
    let store = Arc::new(RedisStore::connect(&credentials.redis_url).await?);
    let repo = StateRepository::new(store.clone(), config.storage.clone());

    // 4. Run once, then always release connections
    let driver = InvocationDriver::new(chat, store, repo, config.telegram.poll_timeout_secs);
    let result = driver.run().await;
    if let Err(e) = driver.shutdown().await {
        tracing::warn!("Failed to release connections: {:#}", e);
    }

    match result {
        Ok(summary) => {
            tracing::info!("Invocation finished: {:?}", summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Invocation aborted: {:#}", e);
            Err(e)
        }
    }
}
