//! Media helpers shared by the plugins
//!
//! - `template`: `{key}` placeholder rendering for names and captions
//! - `download`: chunked HTTP downloads with retry, chunk hook and progress
//! - `progress`: download progress arithmetic
//! - `tags`: FLAC, ID3 and MP4 tag writing

pub mod download;
pub mod progress;
pub mod tags;
pub mod template;

pub use download::{
    ChunkProcessor, DownloadError, DownloadOptions, Downloader, ProgressSink, RetryPolicy,
};
pub use progress::Progress;
pub use tags::{is_taggable, tag_file, ImageKind, TagError, TrackTags};
pub use template::{render, TemplateData};
