use clients::{Translator, WeatherApi, YtDlp};
use media::{Downloader, RetryPolicy};
use std::sync::Arc;
use storage::SettingsStore;
use telegram::{telegram, Config};
use teloxide::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return;
        }
    };

    let settings = match SettingsStore::open(&config.database_path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(
                "Failed to open settings database {}: {}",
                config.database_path.display(),
                e
            );
            return;
        }
    };

    let http = match clients::http_client(config.proxy.as_deref()) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            return;
        }
    };

    let downloader = Downloader::new(
        http.clone(),
        RetryPolicy::new(config.download_retries, config.download_retry_delay),
    );
    let weather = WeatherApi::new(http.clone());
    let translator = Translator::new(http);
    let ytdlp = YtDlp::new(config.ytdl_bin.clone());

    // Initialize the bot from environment variables
    let bot = Bot::from_env();

    if let Err(e) = telegram::set_bot_commands(&bot).await {
        tracing::warn!("Failed to register bot commands: {}", e);
    }

    tracing::info!(
        "Bot started, {} admin(s), downloads in {}",
        config.admins.len(),
        config.download_path.display()
    );

    Dispatcher::builder(bot, telegram::schema())
        .dependencies(dptree::deps![
            config, settings, downloader, weather, translator, ytdlp
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
