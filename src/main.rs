use clap::Parser;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

mod domain;
mod application;
mod infrastructure;

use application::errors::BotError;
use application::messaging::{Dispatcher, MessageParser};
use application::services::{DialogueEngine, WeatherService};
use domain::traits::{Bot, RequestLog};
use infrastructure::adapters::telegram::TelegramAdapter;
use infrastructure::config::{Config, LoggingConfig};
use infrastructure::database::Database;
use infrastructure::storage::SqliteRequestLog;
use infrastructure::weather::WeatherApiProvider;

#[derive(Parser)]
#[command(name = "weather-informer-bot")]
#[command(version, about = "Telegram bot answering with today's weather or tomorrow's forecast", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config and environment)
    #[arg(short, long)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), BotError> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let (config, load_error) = load_config(&cli.config);
    let mut config = config.apply_env();
    if let Some(token) = cli.token {
        config.telegram.token = Some(token);
    }

    init_logging(&config.logging)?;
    if let Some(e) = load_error {
        tracing::warn!("Failed to load config: {}, using defaults", e);
    }

    config.validate()?;

    tracing::info!("Starting {}", config.bot.name);
    run_bot(config).await
}

/// The config file is optional; environment variables alone are enough
fn load_config(path: &str) -> (Config, Option<BotError>) {
    if !Path::new(path).exists() {
        return (Config::default(), None);
    }
    match Config::load(path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e.into())),
    }
}

fn init_logging(config: &LoggingConfig) -> Result<(), BotError> {
    let filter = EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter);

    match &config.file {
        Some(path) => {
            let file = std::fs::File::create(path).map_err(|e| {
                BotError::Internal(format!("Failed to open log file {}: {}", path.display(), e))
            })?;
            subscriber.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => subscriber.init(),
    }

    Ok(())
}

async fn run_bot(config: Config) -> Result<(), BotError> {
    let request_log = Arc::new(SqliteRequestLog::new(Database::new(&config.database.path)));
    if let Err(e) = request_log.ensure_schema().await {
        tracing::error!("Failed to create database: {}", e);
    }

    let mut bot = TelegramAdapter::new(config.token());
    bot.fetch_bot_info().await?;
    if let Err(e) = bot.register_commands().await {
        tracing::warn!("Failed to register commands: {}", e);
    }
    let bot = Arc::new(bot);
    tracing::info!("Bot started: @{}", bot.bot_info().username);

    let provider = WeatherApiProvider::new(config.api_key())
        .with_base_url(config.weather.base_url.as_str())
        .with_language(config.weather.language.as_str())
        .with_timeout(config.weather.timeout());

    let engine = Arc::new(DialogueEngine::new(
        bot.clone(),
        WeatherService::new(Arc::new(provider)),
        request_log,
        Dispatcher::new(config.bot.return_delay()),
    ));

    tokio::select! {
        _ = run_polling(bot, engine, config.telegram.poll_timeout_secs) => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        }
    }

    tracing::info!("Bot stopped");
    Ok(())
}

/// Long-polls Telegram forever. Updates are queued per user in batch order,
/// so a slow user (weather call, return delay) never holds up the others.
async fn run_polling(bot: Arc<TelegramAdapter>, engine: Arc<DialogueEngine>, timeout_seconds: i64) {
    let parser = MessageParser::default();
    let mut offset: i64 = 0;

    tracing::info!("Starting message loop...");

    loop {
        match bot.get_updates(offset, timeout_seconds).await {
            Ok(updates) => {
                if !updates.is_empty() {
                    tracing::debug!("Received {} updates", updates.len());
                }

                for update in &updates {
                    if let Some(incoming) = update.to_incoming(&parser) {
                        engine.dispatch(incoming).await;
                    }
                }

                offset = TelegramAdapter::get_next_offset(&updates, offset);
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
            }
        }
    }
}
