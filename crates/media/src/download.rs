//! Streaming HTTP downloader
//!
//! Writes the response body to a uniquely named `.part` file next to the
//! destination and renames it into place once the body is complete. Failed attempts are retried a fixed number of times
//! with a fixed delay. An optional [`ChunkProcessor`] sees every chunk before
//! it hits the disk (used for stream decryption) and an optional
//! [`ProgressSink`] receives throttled progress updates.

use crate::progress::Progress;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use std::io::SeekFrom;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

/// Default number of attempts per download
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Default pause between attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Default minimum interval between progress reports
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(2);

/// Errors raised while downloading
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("server responded with HTTP {0}")]
    Status(StatusCode),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("download failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: Box<DownloadError>,
    },
}

impl DownloadError {
    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            DownloadError::Status(status) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            DownloadError::Request(_) => true,
            DownloadError::Io(_) | DownloadError::Exhausted { .. } => false,
        }
    }
}

/// Fixed retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }
}

/// Transforms body chunks before they are written
pub trait ChunkProcessor: Send + Sync {
    /// `index` is the zero-based position of the chunk within the body
    fn process(&self, index: usize, chunk: Vec<u8>) -> Vec<u8>;
}

/// Receives progress updates
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn report(&self, progress: Progress);
}

/// Per-download options
#[derive(Default, Clone, Copy)]
pub struct DownloadOptions<'a> {
    chunk_size: Option<usize>,
    processor: Option<&'a dyn ChunkProcessor>,
    progress: Option<&'a dyn ProgressSink>,
}

impl<'a> DownloadOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand the processor fixed-size chunks instead of network-sized ones
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size.max(1));
        self
    }

    pub fn processor(mut self, processor: &'a dyn ChunkProcessor) -> Self {
        self.processor = Some(processor);
        self
    }

    pub fn progress(mut self, sink: &'a dyn ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }
}

/// Splits an arbitrary byte stream into fixed-size pieces
struct Rechunker {
    size: usize,
    buffer: Vec<u8>,
}

impl Rechunker {
    fn new(size: usize) -> Self {
        Self {
            size,
            buffer: Vec::with_capacity(size),
        }
    }

    fn push(&mut self, data: &[u8]) -> Vec<Vec<u8>> {
        self.buffer.extend_from_slice(data);
        let mut pieces = Vec::new();
        while self.buffer.len() >= self.size {
            let rest = self.buffer.split_off(self.size);
            pieces.push(std::mem::replace(&mut self.buffer, rest));
        }
        pieces
    }

    fn finish(self) -> Option<Vec<u8>> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.buffer)
        }
    }
}

/// Downloads files over HTTP with a fixed retry policy
#[derive(Clone)]
pub struct Downloader {
    client: Client,
    retry: RetryPolicy,
    progress_interval: Duration,
}

impl Downloader {
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self {
            client,
            retry,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Change the minimum interval between progress reports
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Download `url` into `dest`
    ///
    /// Returns the number of bytes written. Concurrent downloads to the same
    /// `dest` each stream into their own partial file; the last one to finish
    /// wins.
    pub async fn download(
        &self,
        url: &str,
        dest: &Path,
        options: DownloadOptions<'_>,
    ) -> Result<u64, DownloadError> {
        // The partial file is deleted when `partial` drops without being persisted
        let (file, partial) = partial_file(dest)?.into_parts();
        let mut file = File::from_std(file);
        let attempts = self.retry.attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.attempt(url, &mut file, options).await {
                Ok(written) => {
                    drop(file);
                    partial.persist(dest).map_err(std::io::Error::from)?;
                    tracing::info!("Downloaded {} ({} bytes)", dest.display(), written);
                    return Ok(written);
                }
                Err(err) if !err.is_retryable() => {
                    tracing::error!("Download of {} failed: {}", url, err);
                    return Err(err);
                }
                Err(err) if attempt >= attempts => {
                    tracing::error!("Download of {} failed after {} attempts: {}", url, attempts, err);
                    return Err(DownloadError::Exhausted {
                        attempts,
                        source: Box::new(err),
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        "Download attempt {}/{} for {} failed: {}. Retrying in {:?}",
                        attempt,
                        attempts,
                        url,
                        err,
                        self.retry.delay
                    );
                    tokio::time::sleep(self.retry.delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt(
        &self,
        url: &str,
        file: &mut File,
        options: DownloadOptions<'_>,
    ) -> Result<u64, DownloadError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status(status));
        }

        // Every attempt starts from byte 0
        file.set_len(0).await?;
        file.seek(SeekFrom::Start(0)).await?;

        let total = response.content_length().unwrap_or(0);
        let mut stream = response.bytes_stream();
        let mut rechunker = options.chunk_size.map(Rechunker::new);

        let started = Instant::now();
        let mut last_report = started;
        let mut downloaded: u64 = 0;
        let mut written: u64 = 0;
        let mut index = 0;

        while let Some(item) = stream.next().await {
            let bytes = item?;
            downloaded += bytes.len() as u64;

            let pieces = match rechunker.as_mut() {
                Some(rechunker) => rechunker.push(&bytes),
                None => vec![bytes.to_vec()],
            };
            for piece in pieces {
                written += write_piece(file, options.processor, index, piece).await?;
                index += 1;
            }

            if let Some(sink) = options.progress {
                if last_report.elapsed() >= self.progress_interval {
                    sink.report(Progress::new(downloaded, total, started.elapsed()))
                        .await;
                    last_report = Instant::now();
                }
            }
        }

        if let Some(rest) = rechunker.and_then(Rechunker::finish) {
            written += write_piece(file, options.processor, index, rest).await?;
        }
        file.flush().await?;

        if let Some(sink) = options.progress {
            let total = if total == 0 { downloaded } else { total };
            sink.report(Progress::new(downloaded, total, started.elapsed()))
                .await;
        }

        Ok(written)
    }
}

async fn write_piece(
    file: &mut File,
    processor: Option<&dyn ChunkProcessor>,
    index: usize,
    piece: Vec<u8>,
) -> Result<u64, DownloadError> {
    let data = match processor {
        Some(processor) => processor.process(index, piece),
        None => piece,
    };
    file.write_all(&data).await?;
    Ok(data.len() as u64)
}

/// Fresh `.<name>.XXXXXX.part` file in the destination directory
fn partial_file(dest: &Path) -> std::io::Result<NamedTempFile> {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = dest
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    tempfile::Builder::new()
        .prefix(&format!(".{}.", name))
        .suffix(".part")
        .tempfile_in(dir)
}
