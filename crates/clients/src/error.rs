/// Errors raised by the service clients
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("yt-dlp failed: {0}")]
    YtDlp(String),
    #[error("yt-dlp timed out after {0} seconds")]
    Timeout(u64),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
