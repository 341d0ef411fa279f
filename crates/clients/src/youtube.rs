//! YouTube metadata through `yt-dlp`

use crate::error::{ClientError, ClientResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

static VIDEO_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:youtube\.com/(?:watch\?(?:[^#\s]*&)?v=|shorts/|embed/|live/)|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
    .expect("valid video url regex")
});

static VIDEO_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid video id regex"));

/// Pull the 11 character video id out of a link or a bare id
pub fn extract_video_id(text: &str) -> Option<String> {
    let text = text.trim();
    if VIDEO_ID_RE.is_match(text) {
        return Some(text.to_string());
    }
    VIDEO_URL_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Watch page for a video id
pub fn video_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", id)
}

/// Single entry of the `formats` list
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Format {
    pub format_id: String,
    #[serde(default)]
    pub ext: String,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    pub height: Option<u32>,
    pub abr: Option<f64>,
    pub filesize: Option<u64>,
    pub url: Option<String>,
}

fn has_codec(codec: &Option<String>) -> bool {
    codec.as_deref().is_some_and(|c| c != "none")
}

impl Format {
    pub fn is_audio_only(&self) -> bool {
        has_codec(&self.acodec) && !has_codec(&self.vcodec)
    }

    /// Audio and video in one stream
    pub fn is_progressive(&self) -> bool {
        has_codec(&self.acodec) && has_codec(&self.vcodec)
    }
}

/// Download choice offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Quality {
    Audio,
    Video(u32),
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Audio => write!(f, "audio"),
            Quality::Video(height) => write!(f, "{}p", height),
        }
    }
}

impl FromStr for Quality {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("audio") {
            return Ok(Quality::Audio);
        }
        s.trim_end_matches('p')
            .parse()
            .map(Quality::Video)
            .map_err(|_| ClientError::InvalidInput(format!("unknown quality: {}", s)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub uploader: Option<String>,
    /// Seconds
    pub duration: Option<f64>,
    /// `YYYYMMDD`
    pub upload_date: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub formats: Vec<Format>,
}

impl VideoInfo {
    pub fn from_json(json: &str) -> ClientResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn usable(&self) -> impl Iterator<Item = &Format> {
        self.formats.iter().filter(|f| f.url.is_some())
    }

    /// Audio first, then progressive heights in ascending order
    pub fn qualities(&self) -> Vec<Quality> {
        let mut qualities: Vec<Quality> = self
            .usable()
            .filter(|f| f.is_progressive())
            .filter_map(|f| f.height)
            .map(Quality::Video)
            .collect();
        qualities.sort();
        qualities.dedup();

        if self.usable().any(Format::is_audio_only) {
            qualities.insert(0, Quality::Audio);
        }
        qualities
    }

    /// Format to download for `quality`
    pub fn select(&self, quality: Quality) -> Option<&Format> {
        match quality {
            Quality::Audio => self
                .usable()
                .filter(|f| f.is_audio_only())
                .max_by(|a, b| a.abr.unwrap_or(0.0).total_cmp(&b.abr.unwrap_or(0.0))),
            Quality::Video(height) => self
                .usable()
                .filter(|f| f.is_progressive() && f.height == Some(height))
                .max_by_key(|f| f.filesize.unwrap_or(0)),
        }
    }
}

/// `yt-dlp` executable wrapper
#[derive(Debug, Clone)]
pub struct YtDlp {
    bin: String,
    timeout: Duration,
}

impl YtDlp {
    pub fn new(bin: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch metadata for a single video
    pub async fn video_info(&self, id: &str) -> ClientResult<VideoInfo> {
        tracing::info!("Fetching video info for {}", id);

        let output = timeout(
            self.timeout,
            Command::new(&self.bin)
                .args(["--dump-single-json", "--no-playlist", "--no-warnings"])
                .arg(video_url(id))
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| ClientError::Timeout(self.timeout.as_secs()))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("no output")
                .trim()
                .to_string();
            tracing::warn!("yt-dlp exited with {}: {}", output.status, reason);
            return Err(ClientError::YtDlp(reason));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "dQw4w9WgXcQ",
        "title": "Never Gonna Give You Up",
        "uploader": "Rick Astley",
        "duration": 212.0,
        "upload_date": "20091025",
        "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg",
        "formats": [
            {"format_id": "139", "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.5", "abr": 48.0, "url": "https://a/139"},
            {"format_id": "140", "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.2", "abr": 129.5, "url": "https://a/140"},
            {"format_id": "sb0", "ext": "mhtml", "vcodec": "none", "acodec": "none", "url": "https://a/sb0"},
            {"format_id": "18", "ext": "mp4", "vcodec": "avc1.42001E", "acodec": "mp4a.40.2", "height": 360, "filesize": 100, "url": "https://a/18"},
            {"format_id": "22", "ext": "mp4", "vcodec": "avc1.64001F", "acodec": "mp4a.40.2", "height": 720, "url": "https://a/22"},
            {"format_id": "137", "ext": "mp4", "vcodec": "avc1.640028", "acodec": "none", "height": 1080, "url": "https://a/137"},
            {"format_id": "18b", "ext": "mp4", "vcodec": "avc1.42001E", "acodec": "mp4a.40.2", "height": 360, "filesize": 50, "url": "https://a/18b"},
            {"format_id": "x", "ext": "mp4", "vcodec": "avc1", "acodec": "mp4a", "height": 144}
        ]
    }"#;

    #[test]
    fn test_extract_video_id() {
        let id = Some("dQw4w9WgXcQ".to_string());
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), id);
        assert_eq!(extract_video_id("https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=1"), id);
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abc"), id);
        assert_eq!(extract_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"), id);
        assert_eq!(extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"), id);
        assert_eq!(extract_video_id("  dQw4w9WgXcQ "), id);
    }

    #[test]
    fn test_extract_video_id_invalid() {
        assert_eq!(extract_video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id("short"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_quality_parse_and_display() {
        assert_eq!("audio".parse::<Quality>().unwrap(), Quality::Audio);
        assert_eq!("720".parse::<Quality>().unwrap(), Quality::Video(720));
        assert_eq!("720p".parse::<Quality>().unwrap(), Quality::Video(720));
        assert!("hd".parse::<Quality>().is_err());
        assert_eq!(Quality::Video(360).to_string(), "360p");
        assert_eq!(Quality::Audio.to_string(), "audio");
    }

    #[test]
    fn test_parse_video_info() {
        let info = VideoInfo::from_json(SAMPLE).unwrap();
        assert_eq!(info.id, "dQw4w9WgXcQ");
        assert_eq!(info.uploader.as_deref(), Some("Rick Astley"));
        assert_eq!(info.duration, Some(212.0));
        assert_eq!(info.formats.len(), 8);
    }

    #[test]
    fn test_qualities() {
        let info = VideoInfo::from_json(SAMPLE).unwrap();
        // 1080 is video-only, 144 has no url
        assert_eq!(
            info.qualities(),
            vec![Quality::Audio, Quality::Video(360), Quality::Video(720)]
        );
    }

    #[test]
    fn test_select() {
        let info = VideoInfo::from_json(SAMPLE).unwrap();
        assert_eq!(info.select(Quality::Audio).unwrap().format_id, "140");
        assert_eq!(info.select(Quality::Video(360)).unwrap().format_id, "18");
        assert_eq!(info.select(Quality::Video(720)).unwrap().format_id, "22");
        assert!(info.select(Quality::Video(1080)).is_none());
    }

    #[test]
    fn test_no_audio_formats() {
        let info = VideoInfo {
            id: "abc".into(),
            ..Default::default()
        };
        assert!(info.qualities().is_empty());
        assert!(info.select(Quality::Audio).is_none());
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let ytdlp = YtDlp::new("/nonexistent/yt-dlp");
        assert!(matches!(
            ytdlp.video_info("dQw4w9WgXcQ").await,
            Err(ClientError::Io(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_binary() {
        let ytdlp = YtDlp::new("false").with_timeout(Duration::from_secs(5));
        assert!(matches!(
            ytdlp.video_info("dQw4w9WgXcQ").await,
            Err(ClientError::YtDlp(_))
        ));
    }
}
