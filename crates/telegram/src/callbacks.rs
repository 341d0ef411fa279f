//! Callback query handlers for inline keyboard interactions

use crate::commands::{self, YoutubeRequest};
use crate::config::Config;
use crate::constants::{DEFAULT_YOUTUBE_FILE_NAME, YOUTUBE_PLUGIN};
use crate::error::BotResult;
use crate::handlers;
use crate::types::HandlerResult;
use clients::{Quality, YtDlp};
use media::Downloader;
use std::sync::Arc;
use storage::SettingsStore;
use teloxide::prelude::*;

/// Telegram limits callback data to 64 bytes
const MAX_CALLBACK_DATA_LEN: usize = 64;

/// Parsed callback data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// `yt:<id>:<quality>`
    Youtube { id: String, quality: Quality },
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        if data.len() > MAX_CALLBACK_DATA_LEN {
            return None;
        }

        let parts: Vec<&str> = data.split(':').collect();
        match parts.as_slice() {
            ["yt", id, quality] if !id.is_empty() => Some(CallbackAction::Youtube {
                id: id.to_string(),
                quality: quality.parse().ok()?,
            }),
            _ => None,
        }
    }
}

/// Handle all callback queries from inline keyboards
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    config: Arc<Config>,
    settings: SettingsStore,
    downloader: Downloader,
    ytdlp: YtDlp,
) -> HandlerResult {
    let action = q.data.as_deref().and_then(CallbackAction::parse);

    let (id, quality) = match action {
        Some(CallbackAction::Youtube { id, quality }) => (id, quality),
        None => {
            tracing::warn!("Unknown callback data: {:?}", q.data);
            bot.answer_callback_query(&q.id).await?;
            return Ok(());
        }
    };

    bot.answer_callback_query(&q.id)
        .text("Download is in process")
        .await?;

    let Some(message) = callback_message(&q) else {
        return Ok(());
    };

    let request = handlers::blocking(move || youtube_request(&config, &settings, id, quality)).await;
    let result = match request {
        Ok(request) => commands::download_youtube(&bot, message, request, &downloader, &ytdlp).await,
        Err(err) => Err(err),
    };
    handlers::reply_on_error(&bot, message.chat.id, result).await
}

/// Message the keyboard was attached to; queries from inline mode have none
fn callback_message(q: &CallbackQuery) -> Option<&Message> {
    let message = q.message.as_ref();
    if message.is_none() {
        tracing::warn!(
            "Callback {:?} from user {} has no message to reply to, dropping it",
            q.data,
            q.from.id
        );
    }
    message
}

fn youtube_request(
    config: &Config,
    settings: &SettingsStore,
    id: String,
    quality: Quality,
) -> BotResult<YoutubeRequest> {
    let directory = handlers::download_dir(settings, config)?.join(YOUTUBE_PLUGIN);
    let file_name = settings
        .get(YOUTUBE_PLUGIN, "file_name")?
        .filter(|template| !template.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_YOUTUBE_FILE_NAME.to_string());

    Ok(YoutubeRequest {
        id,
        quality,
        directory,
        file_name,
    })
}
