//! Command handler helper functions
//!
//! Reply formatting shared by the plugins and the error boundary every
//! command goes through.

use crate::config::Config;
use crate::constants::{emoji, DOWNLOAD_PLUGIN};
use crate::error::{BotError, BotResult, UserMessage};
use crate::jalali::JalaliDate;
use crate::types::HandlerResult;
use crate::utils;
use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use clients::{VideoInfo, WeatherReport};
use media::{Progress, ProgressSink};
use std::path::PathBuf;
use std::sync::Arc;
use storage::SettingsStore;
use teloxide::prelude::*;
use teloxide::types::MessageId;

const MEGABYTE: f64 = 1024.0 * 1024.0;
const PROGRESS_SLOTS: usize = 10;

/// Report a failed command back to the chat
///
/// Errors are turned into a reply instead of bubbling up to the dispatcher.
pub async fn reply_on_error(bot: &Bot, chat_id: ChatId, result: BotResult<()>) -> HandlerResult {
    if let Err(err) = result {
        match &err {
            BotError::InvalidArguments(_) => tracing::debug!("Rejected command: {}", err),
            _ => tracing::error!("Command failed: {}", err),
        }
        bot.send_message(chat_id, err.user_message()).await?;
    }
    Ok(())
}

/// Directory downloads are written to
///
/// `DOWNLOAD_PATH` wins over the stored `download.download_path` setting,
/// which wins over the configured default.
pub fn download_dir(settings: &SettingsStore, config: &Config) -> BotResult<PathBuf> {
    let default = config.download_path.to_string_lossy();
    let dir = settings.get_or(DOWNLOAD_PLUGIN, "download_path", &default, true)?;
    Ok(PathBuf::from(dir))
}

/// [`download_dir`] on the blocking pool
pub async fn resolve_download_dir(settings: &SettingsStore, config: &Arc<Config>) -> BotResult<PathBuf> {
    let settings = settings.clone();
    let config = Arc::clone(config);
    blocking(move || download_dir(&settings, &config)).await
}

/// Run synchronous work (SQLite queries, tag writing) off the async workers
pub async fn blocking<T, F>(work: F) -> BotResult<T>
where
    F: FnOnce() -> BotResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}

/// Gregorian date and time in the configured timezone
pub fn format_date(now: &DateTime<Tz>) -> String {
    now.format("Date: %A, %B %d (%m/%d/%Y)\nTime: %H:%M:%S (%Z)")
        .to_string()
}

/// Same layout as [`format_date`] with a Jalali day/month/year date
pub fn format_jdate(now: &DateTime<Tz>) -> String {
    let date = JalaliDate::from(now.date_naive());
    format!(
        "Date: {}, {} {:02} ({:02}/{:02}/{})\nTime: {}",
        now.format("%A"),
        date.month_name(),
        date.day,
        date.day,
        date.month,
        date.year,
        now.format("%H:%M:%S (%Z)")
    )
}

/// Weather report lines; absent fields are left out
pub fn format_weather(report: &WeatherReport) -> String {
    let mut lines = Vec::new();

    if let Some(country) = &report.country {
        match &report.country_code {
            Some(code) => lines.push(format!("Country: {} ({})", country, code)),
            None => lines.push(format!("Country: {}", country)),
        }
    }
    if let Some(region) = &report.region {
        lines.push(format!("Region: {}", region));
    }
    if let Some(subregion) = &report.subregion {
        lines.push(format!("District: {}", subregion));
    }
    if let Some(population) = report.population.filter(|p| *p > 0) {
        lines.push(format!("Population: {}", utils::format_thousands(population)));
    }
    lines.push(format!("Timezone: {}", report.timezone));
    lines.push(format!("Temperature: {}", report.temperature));

    lines.join("\n")
}

/// Short description shown above the quality buttons
pub fn format_video_summary(info: &VideoInfo) -> String {
    let mut text = format!("{} {}", emoji::VIDEO, info.title);

    if let Some(uploader) = &info.uploader {
        text.push_str(&format!("\nUploader: {}", uploader));
    }
    if let Some(duration) = info.duration {
        text.push_str(&format!(
            "\nDuration: {}",
            utils::format_duration(duration.max(0.0) as u64)
        ));
    }
    if let Some(date) = &info.upload_date {
        let date = chrono::NaiveDate::parse_from_str(date, "%Y%m%d")
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| date.clone());
        text.push_str(&format!("\nUploaded: {}", date));
    }

    text
}

/// Progress text for a running or finished download
pub fn format_progress(file_name: &str, progress: &Progress) -> String {
    if progress.is_complete() {
        let seconds = progress.elapsed.as_secs_f64();
        let size = progress.total as f64 / MEGABYTE;
        let speed = if seconds > 0.0 { size / seconds } else { 0.0 };
        return format!(
            "Downloaded: {}\n\
            File Size: {:.2} MB\n\
            Estimated Speed: {:.2} MB/s\n\
            Download completed in {:.2} seconds.",
            file_name, size, speed, seconds
        );
    }

    let percentage = progress.percentage();
    let filled = ((percentage / 10.0) as usize).min(PROGRESS_SLOTS);
    let total = if progress.total == 0 {
        "unknown".to_string()
    } else {
        format!("{:.2} MB", progress.total as f64 / MEGABYTE)
    };

    format!(
        "Downloading: {}\n\
        [{}{}] {:.2}%\n\
        Downloaded: {:.2} MB of {}\n\
        Speed: {:.2} MB/s\n\
        ETA: {}",
        file_name,
        "=".repeat(filled),
        " ".repeat(PROGRESS_SLOTS - filled),
        percentage,
        progress.downloaded as f64 / MEGABYTE,
        total,
        progress.speed() / MEGABYTE,
        utils::format_duration(progress.eta().as_secs())
    )
}

/// Shows download progress by editing a status message
pub struct MessageProgress {
    bot: Bot,
    chat_id: ChatId,
    message_id: MessageId,
    file_name: String,
}

impl MessageProgress {
    pub fn new(bot: Bot, message: &Message, file_name: impl Into<String>) -> Self {
        Self {
            bot,
            chat_id: message.chat.id,
            message_id: message.id,
            file_name: file_name.into(),
        }
    }
}

#[async_trait]
impl ProgressSink for MessageProgress {
    async fn report(&self, progress: Progress) {
        let text = format_progress(&self.file_name, &progress);
        if let Err(err) = self
            .bot
            .edit_message_text(self.chat_id, self.message_id, text)
            .await
        {
            tracing::debug!("Progress update skipped: {}", err);
        }
    }
}
