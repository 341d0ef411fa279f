use crate::constants::emoji;
use std::fmt;

/// Custom error type for telegram bot operations
#[derive(Debug)]
pub enum BotError {
    /// Telegram API error
    TelegramError(teloxide::RequestError),
    /// Weather, translate or yt-dlp failure
    ClientError(clients::ClientError),
    /// File download failure
    DownloadError(media::DownloadError),
    /// Tag writing failure
    TagError(media::TagError),
    /// Settings database failure
    SettingsError(storage::SettingsError),
    /// Local file system failure
    IoError(std::io::Error),
    /// Blocking task panicked or was cancelled
    TaskError(tokio::task::JoinError),
    /// Invalid command arguments
    InvalidArguments(String),
    /// Generic error with message
    Message(String),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::TelegramError(e) => write!(f, "Telegram error: {}", e),
            BotError::ClientError(e) => write!(f, "Service error: {}", e),
            BotError::DownloadError(e) => write!(f, "Download error: {}", e),
            BotError::TagError(e) => write!(f, "Tagging error: {}", e),
            BotError::SettingsError(e) => write!(f, "Settings error: {}", e),
            BotError::IoError(e) => write!(f, "File error: {}", e),
            BotError::TaskError(e) => write!(f, "Background task failed: {}", e),
            BotError::InvalidArguments(msg) => write!(f, "Invalid arguments: {}", msg),
            BotError::Message(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for BotError {}

impl From<teloxide::RequestError> for BotError {
    fn from(err: teloxide::RequestError) -> Self {
        BotError::TelegramError(err)
    }
}

impl From<clients::ClientError> for BotError {
    fn from(err: clients::ClientError) -> Self {
        BotError::ClientError(err)
    }
}

impl From<media::DownloadError> for BotError {
    fn from(err: media::DownloadError) -> Self {
        BotError::DownloadError(err)
    }
}

impl From<media::TagError> for BotError {
    fn from(err: media::TagError) -> Self {
        BotError::TagError(err)
    }
}

impl From<storage::SettingsError> for BotError {
    fn from(err: storage::SettingsError) -> Self {
        BotError::SettingsError(err)
    }
}

impl From<std::io::Error> for BotError {
    fn from(err: std::io::Error) -> Self {
        BotError::IoError(err)
    }
}

impl From<tokio::task::JoinError> for BotError {
    fn from(err: tokio::task::JoinError) -> Self {
        BotError::TaskError(err)
    }
}

/// Result type alias for bot operations
pub type BotResult<T> = Result<T, BotError>;

/// Helper trait to convert results into user-friendly messages
pub trait UserMessage {
    fn user_message(&self) -> String;
}

impl UserMessage for BotError {
    fn user_message(&self) -> String {
        match self {
            BotError::TelegramError(e) => format!("{} Communication error: {}", emoji::ERROR, e),
            BotError::ClientError(clients::ClientError::InvalidInput(msg)) => {
                format!("{} {}", emoji::ERROR, msg)
            }
            BotError::InvalidArguments(msg) | BotError::Message(msg) => {
                format!("{} {}", emoji::ERROR, msg)
            }
            other => format!("{} {}", emoji::ERROR, other),
        }
    }
}
