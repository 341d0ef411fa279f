//! Audio tag writing for downloaded tracks

use crate::template::TemplateData;
use std::path::Path;

/// Covers at or below this size are treated as placeholders and skipped
pub const MIN_COVER_SIZE: usize = 4 * 1024;

/// Default comment stored in every tagged file
pub const DEFAULT_COMMENT: &str = "Downloaded by assistbot";

#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("FLAC tag error: {0}")]
    Flac(#[from] metaflac::Error),
    #[error("ID3 tag error: {0}")]
    Id3(#[from] id3::Error),
    #[error("MP4 tag error: {0}")]
    Mp4(#[from] mp4ameta::Error),
    #[error("cover error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tag values written into a track; empty strings are skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub album_artist: String,
    pub track_number: String,
    pub total_tracks: String,
    pub disc_number: String,
    pub total_discs: String,
    pub date: String,
    pub genre: String,
    pub composer: String,
    pub copyright: String,
    pub comment: String,
}

impl TrackTags {
    /// Fill tags from template data using the usual key names
    pub fn from_template_data(data: &TemplateData) -> Self {
        let field = |key: &str| data.render(&format!("{{{}}}", key), Some(""));
        Self {
            title: field("name"),
            artist: field("artist"),
            album: field("album_name"),
            album_artist: field("album_artist"),
            track_number: field("track_number"),
            total_tracks: field("total_tracks"),
            disc_number: field("disc_number"),
            total_discs: field("total_discs"),
            date: field("date"),
            genre: field("genre"),
            composer: field("composer"),
            copyright: field("copyright"),
            comment: DEFAULT_COMMENT.to_string(),
        }
    }

    /// Vorbis comment names paired with their values
    fn vorbis_fields(&self) -> [(&'static str, &str); 13] {
        [
            ("TITLE", self.title.as_str()),
            ("ARTIST", self.artist.as_str()),
            ("ALBUM", self.album.as_str()),
            ("ALBUMARTIST", self.album_artist.as_str()),
            ("TRACKNUMBER", self.track_number.as_str()),
            ("TOTALTRACKS", self.total_tracks.as_str()),
            ("DISCNUMBER", self.disc_number.as_str()),
            ("TOTALDISCS", self.total_discs.as_str()),
            ("DATE", self.date.as_str()),
            ("GENRE", self.genre.as_str()),
            ("COMPOSER", self.composer.as_str()),
            ("COPYRIGHT", self.copyright.as_str()),
            ("COMMENT", self.comment.as_str()),
        ]
    }
}

/// `n` or `n/total` as used by TRCK/TPOS
fn numbered(number: &str, total: &str) -> String {
    match (number.is_empty(), total.is_empty()) {
        (false, false) => format!("{}/{}", number, total),
        (false, true) => number.to_string(),
        _ => String::new(),
    }
}

/// Image formats recognised from their leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageKind {
    pub fn detect(data: &[u8]) -> Option<Self> {
        match data {
            [0xFF, 0xD8, 0xFF, ..] => Some(ImageKind::Jpeg),
            [0x89, b'P', b'N', b'G', ..] => Some(ImageKind::Png),
            [b'G', b'I', b'F', b'8', ..] => Some(ImageKind::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => {
                Some(ImageKind::Webp)
            }
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Gif => "image/gif",
            ImageKind::Webp => "image/webp",
        }
    }
}

struct Cover {
    kind: ImageKind,
    data: Vec<u8>,
}

fn read_cover(cover: Option<&Path>) -> Result<Option<Cover>, TagError> {
    let Some(path) = cover else {
        return Ok(None);
    };
    let data = std::fs::read(path)?;
    if data.len() <= MIN_COVER_SIZE {
        tracing::debug!("Cover {} too small, skipping", path.display());
        return Ok(None);
    }
    match ImageKind::detect(&data) {
        Some(kind) => Ok(Some(Cover { kind, data })),
        None => {
            tracing::debug!("Cover {} is not a known image format, skipping", path.display());
            Ok(None)
        }
    }
}

/// Containers [`tag_file`] can write to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Flac,
    Mp3,
    Mp4,
}

fn container(path: &Path) -> Option<Container> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "flac" => Some(Container::Flac),
        "mp3" => Some(Container::Mp3),
        "m4a" | "mp4" => Some(Container::Mp4),
        _ => None,
    }
}

/// Whether [`tag_file`] knows how to tag the file at `path`
pub fn is_taggable(path: &Path) -> bool {
    container(path).is_some()
}

/// Write `tags` (and the cover image, if any) into the file at `path`
///
/// The container is chosen by extension. Returns `false` without touching
/// the file when the format is not supported.
pub fn tag_file(path: &Path, cover: Option<&Path>, tags: &TrackTags) -> Result<bool, TagError> {
    match container(path) {
        Some(Container::Flac) => tag_flac(path, cover, tags)?,
        Some(Container::Mp3) => tag_mp3(path, cover, tags)?,
        Some(Container::Mp4) => tag_mp4(path, cover, tags)?,
        None => {
            tracing::debug!("No tagger for {}", path.display());
            return Ok(false);
        }
    }

    tracing::info!("Tagged {}", path.display());
    Ok(true)
}

fn tag_flac(path: &Path, cover: Option<&Path>, tags: &TrackTags) -> Result<(), TagError> {
    use metaflac::block::PictureType;

    let mut tag = metaflac::Tag::read_from_path(path)?;
    for (key, value) in tags.vorbis_fields() {
        if value.is_empty() {
            continue;
        }
        tag.set_vorbis(key, vec![value]);
    }

    if let Some(cover) = read_cover(cover)? {
        tag.remove_picture_type(PictureType::CoverFront);
        tag.add_picture(cover.kind.mime_type(), PictureType::CoverFront, cover.data);
    }

    tag.save()?;
    Ok(())
}

fn tag_mp3(path: &Path, cover: Option<&Path>, tags: &TrackTags) -> Result<(), TagError> {
    use id3::frame::{Comment, Picture, PictureType};
    use id3::{ErrorKind, Tag, TagLike, Version};

    let mut tag = match Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(err) if matches!(err.kind, ErrorKind::NoTag) => Tag::new(),
        Err(err) => return Err(err.into()),
    };

    let track = numbered(&tags.track_number, &tags.total_tracks);
    let disc = numbered(&tags.disc_number, &tags.total_discs);
    let frames = [
        ("TIT2", tags.title.as_str()),
        ("TPE1", tags.artist.as_str()),
        ("TALB", tags.album.as_str()),
        ("TPE2", tags.album_artist.as_str()),
        ("TRCK", track.as_str()),
        ("TPOS", disc.as_str()),
        ("TDRC", tags.date.as_str()),
        ("TCON", tags.genre.as_str()),
        ("TCOM", tags.composer.as_str()),
        ("TCOP", tags.copyright.as_str()),
    ];
    for (id, value) in frames {
        if !value.is_empty() {
            tag.set_text(id, value);
        }
    }

    if !tags.comment.is_empty() {
        tag.add_frame(Comment {
            lang: "eng".to_string(),
            description: String::new(),
            text: tags.comment.clone(),
        });
    }

    if let Some(cover) = read_cover(cover)? {
        tag.add_frame(Picture {
            mime_type: cover.kind.mime_type().to_string(),
            picture_type: PictureType::CoverFront,
            description: String::new(),
            data: cover.data,
        });
    }

    tag.write_to_path(path, Version::Id3v24)?;
    Ok(())
}

fn tag_mp4(path: &Path, cover: Option<&Path>, tags: &TrackTags) -> Result<(), TagError> {
    use mp4ameta::Img;

    let mut tag = mp4ameta::Tag::read_from_path(path)?;

    let text = |value: &str| (!value.is_empty()).then(|| value.to_string());
    if let Some(title) = text(&tags.title) {
        tag.set_title(title);
    }
    if let Some(artist) = text(&tags.artist) {
        tag.set_artist(artist);
    }
    if let Some(album) = text(&tags.album) {
        tag.set_album(album);
    }
    if let Some(album_artist) = text(&tags.album_artist) {
        tag.set_album_artist(album_artist);
    }
    if let Some(date) = text(&tags.date) {
        tag.set_year(date);
    }
    if let Some(genre) = text(&tags.genre) {
        tag.set_genre(genre);
    }
    if let Some(composer) = text(&tags.composer) {
        tag.set_composer(composer);
    }
    if let Some(copyright) = text(&tags.copyright) {
        tag.set_copyright(copyright);
    }
    if let Some(comment) = text(&tags.comment) {
        tag.set_comment(comment);
    }

    if let Ok(number) = tags.track_number.parse::<u16>() {
        tag.set_track_number(number);
    }
    if let Ok(total) = tags.total_tracks.parse::<u16>() {
        tag.set_total_tracks(total);
    }
    if let Ok(number) = tags.disc_number.parse::<u16>() {
        tag.set_disc_number(number);
    }
    if let Ok(total) = tags.total_discs.parse::<u16>() {
        tag.set_total_discs(total);
    }

    // MP4 artwork only carries JPEG, PNG or BMP
    if let Some(cover) = read_cover(cover)? {
        match cover.kind {
            ImageKind::Jpeg => tag.set_artwork(Img::jpeg(cover.data)),
            ImageKind::Png => tag.set_artwork(Img::png(cover.data)),
            other => tracing::debug!("Skipping {:?} cover for {}", other, path.display()),
        }
    }

    tag.write_to_path(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Smallest file metaflac accepts: marker plus an empty STREAMINFO block
    fn minimal_flac() -> Vec<u8> {
        let mut data = b"fLaC".to_vec();
        data.extend_from_slice(&[0x80, 0x00, 0x00, 0x22]);
        data.extend_from_slice(&[0u8; 34]);
        data
    }

    /// JPEG magic followed by filler, large enough to count as a cover
    fn jpeg_cover(len: usize) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
        data.resize(len, 7);
        data
    }

    fn sample_tags() -> TrackTags {
        let mut data = TemplateData::from_value(&json!({
            "title": "Song",
            "artist": {"name": "Artist"},
            "track_number": "03",
            "album": {"title": "Album", "artist": {"name": "Band"}, "tracks_count": 12, "media_count": 1},
        }));
        data.insert("disc_number", 1);
        TrackTags::from_template_data(&data)
    }

    #[test]
    fn test_from_template_data() {
        let tags = sample_tags();
        assert_eq!(tags.title, "Song");
        assert_eq!(tags.artist, "Artist");
        assert_eq!(tags.album, "Album");
        assert_eq!(tags.album_artist, "Band");
        assert_eq!(tags.track_number, "03");
        assert_eq!(tags.total_tracks, "12");
        assert_eq!(tags.disc_number, "1");
        assert_eq!(tags.total_discs, "1");
        // missing keys render empty
        assert_eq!(tags.genre, "");
        assert_eq!(tags.copyright, "");
        assert_eq!(tags.comment, DEFAULT_COMMENT);
    }

    #[test]
    fn test_numbered() {
        assert_eq!(numbered("3", "12"), "3/12");
        assert_eq!(numbered("3", ""), "3");
        assert_eq!(numbered("", "12"), "");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("video.webm");
        std::fs::write(&path, b"not audio").unwrap();

        assert!(!tag_file(&path, None, &sample_tags()).unwrap());
        assert_eq!(std::fs::read(&path).unwrap(), b"not audio");
    }

    #[test]
    fn test_tag_mp3() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        std::fs::write(&path, [0xFFu8, 0xFB, 0x90, 0x00, 0, 0, 0, 0]).unwrap();

        let cover = dir.path().join("cover");
        std::fs::write(&cover, jpeg_cover(MIN_COVER_SIZE + 1)).unwrap();

        assert!(tag_file(&path, Some(&cover), &sample_tags()).unwrap());

        use id3::TagLike;
        let tag = id3::Tag::read_from_path(&path).unwrap();
        assert_eq!(tag.title(), Some("Song"));
        assert_eq!(tag.artist(), Some("Artist"));
        assert_eq!(tag.album(), Some("Album"));
        assert_eq!(tag.album_artist(), Some("Band"));
        assert_eq!(tag.track(), Some(3));
        assert_eq!(tag.total_tracks(), Some(12));
        let pictures: Vec<_> = tag.pictures().collect();
        assert_eq!(pictures.len(), 1);
        assert_eq!(pictures[0].mime_type, "image/jpeg");
        assert!(tag.genre().is_none());
    }

    #[test]
    fn test_tag_mp3_skips_small_cover() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        std::fs::write(&path, [0xFFu8, 0xFB, 0x90, 0x00]).unwrap();

        let cover = dir.path().join("cover.jpg");
        std::fs::write(&cover, jpeg_cover(100)).unwrap();

        tag_file(&path, Some(&cover), &sample_tags()).unwrap();

        use id3::TagLike;
        let tag = id3::Tag::read_from_path(&path).unwrap();
        assert_eq!(tag.pictures().count(), 0);
    }

    #[test]
    fn test_tag_flac() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.FLAC");
        std::fs::write(&path, minimal_flac()).unwrap();

        assert!(tag_file(&path, None, &sample_tags()).unwrap());

        let tag = metaflac::Tag::read_from_path(&path).unwrap();
        let title: Vec<&str> = tag.get_vorbis("TITLE").unwrap().collect();
        assert_eq!(title, vec!["Song"]);
        let album_artist: Vec<&str> = tag.get_vorbis("ALBUMARTIST").unwrap().collect();
        assert_eq!(album_artist, vec!["Band"]);
        assert!(tag.get_vorbis("GENRE").is_none());
    }

    #[test]
    fn test_missing_cover_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        std::fs::write(&path, [0xFFu8, 0xFB]).unwrap();

        let result = tag_file(&path, Some(&dir.path().join("nope.jpg")), &sample_tags());
        assert!(matches!(result, Err(TagError::Io(_))));
    }

    #[test]
    fn test_cover_mime_comes_from_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        std::fs::write(&path, [0xFFu8, 0xFB, 0x90, 0x00]).unwrap();

        // named .jpg but actually a PNG
        let cover = dir.path().join("cover.jpg");
        let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        png.resize(MIN_COVER_SIZE + 1, 0);
        std::fs::write(&cover, png).unwrap();

        tag_file(&path, Some(&cover), &sample_tags()).unwrap();

        use id3::TagLike;
        let tag = id3::Tag::read_from_path(&path).unwrap();
        let pictures: Vec<_> = tag.pictures().collect();
        assert_eq!(pictures.len(), 1);
        assert_eq!(pictures[0].mime_type, "image/png");
    }

    #[test]
    fn test_unknown_cover_format_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        std::fs::write(&path, [0xFFu8, 0xFB, 0x90, 0x00]).unwrap();

        let cover = dir.path().join("cover.bin");
        std::fs::write(&cover, vec![7u8; MIN_COVER_SIZE + 1]).unwrap();

        assert!(tag_file(&path, Some(&cover), &sample_tags()).unwrap());

        use id3::TagLike;
        let tag = id3::Tag::read_from_path(&path).unwrap();
        assert_eq!(tag.pictures().count(), 0);
        assert_eq!(tag.title(), Some("Song"));
    }

    #[test]
    fn test_image_kind_detect() {
        assert_eq!(ImageKind::detect(&[0xFF, 0xD8, 0xFF, 0xDB]), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::detect(b"\x89PNG\r\n\x1a\n"), Some(ImageKind::Png));
        assert_eq!(ImageKind::detect(b"GIF89a"), Some(ImageKind::Gif));
        assert_eq!(ImageKind::detect(b"RIFF\x10\x00\x00\x00WEBPVP8 "), Some(ImageKind::Webp));
        assert_eq!(ImageKind::detect(b"RIFF\x10\x00\x00\x00WAVE"), None);
        assert_eq!(ImageKind::detect(b""), None);
        assert_eq!(ImageKind::Webp.mime_type(), "image/webp");
    }

    #[test]
    fn test_is_taggable() {
        assert!(is_taggable(Path::new("a/song.flac")));
        assert!(is_taggable(Path::new("song.MP3")));
        assert!(is_taggable(Path::new("Rick Astley - Never Gonna Give You Up.m4a")));
        assert!(is_taggable(Path::new("clip.mp4")));
        assert!(!is_taggable(Path::new("clip.webm")));
        assert!(!is_taggable(Path::new("no_extension")));
    }

    #[test]
    fn test_tag_m4a_rejects_non_mp4_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.m4a");
        std::fs::write(&path, b"definitely not an mp4 container").unwrap();

        let result = tag_file(&path, None, &sample_tags());
        assert!(matches!(result, Err(TagError::Mp4(_))));
    }
}
