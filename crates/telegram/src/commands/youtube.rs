//! YouTube downloads
//!
//! `/youtube <url>` shows the video with one button per quality; pressing a
//! button runs [`download_youtube`] from the callback handler.

use crate::constants::{emoji, usage};
use crate::error::{BotError, BotResult};
use crate::handlers::{self, MessageProgress};
use crate::keyboards;
use crate::types::HandlerResult;
use crate::utils;
use clients::{Format, Quality, VideoInfo, YtDlp};
use media::{DownloadOptions, Downloader, TemplateData, TrackTags};
use serde_json::json;
use std::future::Future;
use std::path::{Path, PathBuf};
use teloxide::{prelude::*, types::InputFile};

/// What to fetch and where to put it
#[derive(Debug, Clone)]
pub struct YoutubeRequest {
    pub id: String,
    pub quality: Quality,
    pub directory: PathBuf,
    /// `{key}` template for the file name, without extension
    pub file_name: String,
}

/// /youtube <url or id>
pub async fn youtube(bot: Bot, msg: Message, args: String, ytdlp: YtDlp) -> HandlerResult {
    let result = show_video(&bot, &msg, &args, &ytdlp).await;
    handlers::reply_on_error(&bot, msg.chat.id, result).await
}

async fn show_video(bot: &Bot, msg: &Message, args: &str, ytdlp: &YtDlp) -> BotResult<()> {
    let id = clients::extract_video_id(args)
        .ok_or_else(|| BotError::InvalidArguments(usage::YOUTUBE.to_string()))?;

    let info = ytdlp.video_info(&id).await?;
    if info.qualities().is_empty() {
        return Err(BotError::Message("No downloadable formats found.".to_string()));
    }

    bot.send_message(msg.chat.id, handlers::format_video_summary(&info))
        .reply_markup(keyboards::youtube_quality_keyboard(&info))
        .await?;
    Ok(())
}

/// Values available to the file name template and the tagger
pub fn template_data(info: &VideoInfo, format: &Format, quality: Quality) -> TemplateData {
    let date = info.upload_date.as_deref().map(|date| {
        chrono::NaiveDate::parse_from_str(date, "%Y%m%d")
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| date.to_string())
    });

    TemplateData::from_value(&json!({
        "id": info.id,
        "title": info.title,
        "artist": info.uploader,
        "album_artist": info.uploader,
        "date": date,
        "quality": quality.to_string(),
        "ext": format.ext,
    }))
}

/// Output file name rendered from `template`, missing keys dropped
pub fn render_file_name(template: &str, data: &TemplateData, ext: &str) -> String {
    let name = utils::sanitize_file_name(&data.render(template, Some("")));
    if ext.is_empty() {
        name
    } else {
        format!("{}.{}", name, ext)
    }
}

/// Fetch the thumbnail next to the media file; failures are not fatal
///
/// The image format is sniffed by the tagger, so the file has no image extension.
async fn download_cover(downloader: &Downloader, info: &VideoInfo, dir: &Path) -> Option<PathBuf> {
    let url = info.thumbnail.as_deref()?;
    let path = dir.join(format!("{}.thumbnail", info.id));
    match downloader.download(url, &path, DownloadOptions::new()).await {
        Ok(_) => Some(path),
        Err(err) => {
            tracing::warn!("Thumbnail download failed for {}: {}", info.id, err);
            None
        }
    }
}

/// Download, tag and upload one video in the requested quality
pub async fn download_youtube(
    bot: &Bot,
    message: &Message,
    request: YoutubeRequest,
    downloader: &Downloader,
    ytdlp: &YtDlp,
) -> BotResult<()> {
    let info = ytdlp.video_info(&request.id).await?;
    let format = info.select(request.quality).ok_or_else(|| {
        BotError::Message(format!("{} is not available for this video.", request.quality))
    })?;
    let url = format
        .url
        .as_deref()
        .ok_or_else(|| BotError::Message("The selected format has no download URL.".to_string()))?;

    let data = template_data(&info, format, request.quality);
    let file_name = render_file_name(&request.file_name, &data, &format.ext);
    tokio::fs::create_dir_all(&request.directory).await?;
    let path = request.directory.join(&file_name);

    tracing::info!(
        "Downloading {} ({}) to {}",
        info.id,
        request.quality,
        path.display()
    );
    let status = bot
        .send_message(
            message.chat.id,
            format!("{} Downloading {}.", emoji::DOWNLOAD, file_name),
        )
        .await?;
    let progress = MessageProgress::new(bot.clone(), &status, file_name.as_str());
    downloader
        .download(url, &path, DownloadOptions::new().progress(&progress))
        .await?;

    // Only fetch a thumbnail when it can be embedded
    let cover = if media::is_taggable(&path) {
        download_cover(downloader, &info, &request.directory).await
    } else {
        None
    };

    let upload = async {
        let tags = TrackTags::from_template_data(&data);
        if tag_in_background(&path, cover.as_deref(), tags).await? {
            tracing::debug!("Tagged {}", path.display());
        }
        upload_media(bot, message, &info, request.quality, &path).await
    };
    remove_cover_after(cover.as_deref(), upload).await?;

    bot.send_message(message.chat.id, "Download is done.").await?;
    Ok(())
}

/// [`media::tag_file`] on the blocking pool
async fn tag_in_background(path: &Path, cover: Option<&Path>, tags: TrackTags) -> BotResult<bool> {
    let path = path.to_path_buf();
    let cover = cover.map(Path::to_path_buf);
    handlers::blocking(move || Ok(media::tag_file(&path, cover.as_deref(), &tags)?)).await
}

async fn upload_media(
    bot: &Bot,
    message: &Message,
    info: &VideoInfo,
    quality: Quality,
    path: &Path,
) -> BotResult<()> {
    match quality {
        Quality::Audio => {
            let mut upload = bot
                .send_audio(message.chat.id, InputFile::file(path))
                .title(info.title.clone());
            if let Some(uploader) = &info.uploader {
                upload = upload.performer(uploader.clone());
            }
            upload.await?;
        }
        Quality::Video(_) => {
            bot.send_video(message.chat.id, InputFile::file(path))
                .caption(info.title.clone())
                .supports_streaming(true)
                .await?;
        }
    }
    Ok(())
}

/// Await `work`, then delete the thumbnail whether it succeeded or not
async fn remove_cover_after<F>(cover: Option<&Path>, work: F) -> BotResult<()>
where
    F: Future<Output = BotResult<()>>,
{
    let result = work.await;
    if let Some(cover) = cover {
        if let Err(err) = tokio::fs::remove_file(cover).await {
            tracing::debug!("Could not remove {}: {}", cover.display(), err);
        }
    }
    result
}
