//! Direct file downloads: /download <url> [name]

use crate::config::Config;
use crate::constants::{emoji, usage, FALLBACK_FILE_NAME};
use crate::error::{BotError, BotResult};
use crate::handlers::{self, MessageProgress};
use crate::types::HandlerResult;
use crate::utils;
use media::{DownloadOptions, Downloader};
use std::sync::Arc;
use storage::SettingsStore;
use teloxide::{prelude::*, types::InputFile};
use url::Url;

/// Split `/download` arguments into the URL and the target file name
pub fn parse_download_args(args: &str) -> BotResult<(Url, String)> {
    let parts = utils::split_args(args, 2);
    let raw = parts
        .first()
        .ok_or_else(|| BotError::InvalidArguments(usage::DOWNLOAD.to_string()))?;

    let url = Url::parse(raw)
        .map_err(|e| BotError::InvalidArguments(format!("Invalid URL {}: {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(BotError::InvalidArguments(format!(
            "Only http and https URLs are supported, got {}",
            url.scheme()
        )));
    }

    let name = parts
        .get(1)
        .map(|name| utils::sanitize_file_name(name))
        .or_else(|| utils::file_name_from_url(&url))
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());

    Ok((url, name))
}

pub async fn download(
    bot: Bot,
    msg: Message,
    args: String,
    config: Arc<Config>,
    settings: SettingsStore,
    downloader: Downloader,
) -> HandlerResult {
    let result = download_and_upload(&bot, &msg, &args, &config, &settings, &downloader).await;
    handlers::reply_on_error(&bot, msg.chat.id, result).await
}

async fn download_and_upload(
    bot: &Bot,
    msg: &Message,
    args: &str,
    config: &Arc<Config>,
    settings: &SettingsStore,
    downloader: &Downloader,
) -> BotResult<()> {
    let (url, name) = parse_download_args(args)?;

    let dir = handlers::resolve_download_dir(settings, config).await?;
    tokio::fs::create_dir_all(&dir).await?;
    let path = dir.join(&name);

    tracing::info!("Downloading {} to {}", url, path.display());
    let status = bot
        .send_message(msg.chat.id, format!("{} Downloading {}.", emoji::DOWNLOAD, name))
        .await?;
    let progress = MessageProgress::new(bot.clone(), &status, name.as_str());

    downloader
        .download(url.as_str(), &path, DownloadOptions::new().progress(&progress))
        .await?;

    bot.send_document(msg.chat.id, InputFile::file(&path))
        .await?;
    bot.send_message(msg.chat.id, "Download is done.").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_name() {
        let (url, name) = parse_download_args("https://example.com/a.bin my file.bin").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a.bin");
        assert_eq!(name, "my file.bin");
    }

    #[test]
    fn test_parse_name_from_url() {
        let (_, name) = parse_download_args("https://example.com/files/song.mp3").unwrap();
        assert_eq!(name, "song.mp3");

        let (_, name) = parse_download_args("https://example.com/").unwrap();
        assert_eq!(name, "download");
    }

    #[test]
    fn test_parse_sanitizes_name() {
        let (_, name) = parse_download_args("https://example.com/x ../../etc/passwd").unwrap();
        assert_eq!(name, "_.._etc_passwd");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(parse_download_args(""), Err(BotError::InvalidArguments(_))));
        assert!(matches!(
            parse_download_args("not a url"),
            Err(BotError::InvalidArguments(_))
        ));
        assert!(matches!(
            parse_download_args("ftp://example.com/file"),
            Err(BotError::InvalidArguments(_))
        ));
    }
}
