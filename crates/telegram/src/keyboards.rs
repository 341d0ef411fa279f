//! Inline keyboard builders

use crate::constants::emoji;
use crate::utils;
use clients::{Quality, VideoInfo};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Quality buttons per keyboard row
const BUTTONS_PER_ROW: usize = 2;

/// Callback data for a YouTube download button
pub fn youtube_callback_data(id: &str, quality: Quality) -> String {
    format!("yt:{}:{}", id, quality)
}

fn quality_label(info: &VideoInfo, quality: Quality) -> String {
    let size = info
        .select(quality)
        .and_then(|format| format.filesize)
        .map(|size| format!(" ({})", utils::format_bytes(size)))
        .unwrap_or_default();

    match quality {
        Quality::Audio => format!("{} Audio{}", emoji::AUDIO, size),
        Quality::Video(_) => format!("{} {}{}", emoji::VIDEO, quality, size),
    }
}

/// One button per available quality
pub fn youtube_quality_keyboard(info: &VideoInfo) -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = info
        .qualities()
        .into_iter()
        .map(|quality| {
            InlineKeyboardButton::callback(
                quality_label(info, quality),
                youtube_callback_data(&info.id, quality),
            )
        })
        .collect();

    let rows: Vec<Vec<InlineKeyboardButton>> = buttons
        .chunks(BUTTONS_PER_ROW)
        .map(|row| row.to_vec())
        .collect();

    InlineKeyboardMarkup::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clients::Format;
    use teloxide::types::InlineKeyboardButtonKind;

    fn format(id: &str, vcodec: &str, height: Option<u32>, filesize: Option<u64>) -> Format {
        Format {
            format_id: id.into(),
            ext: "mp4".into(),
            vcodec: Some(vcodec.into()),
            acodec: Some("mp4a.40.2".into()),
            height,
            abr: Some(128.0),
            filesize,
            url: Some(format!("https://example.com/{}", id)),
        }
    }

    fn callback_data(button: &InlineKeyboardButton) -> &str {
        match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => data,
            _ => panic!("expected callback button"),
        }
    }

    #[test]
    fn test_callback_data() {
        assert_eq!(youtube_callback_data("abc", Quality::Audio), "yt:abc:audio");
        assert_eq!(youtube_callback_data("abc", Quality::Video(720)), "yt:abc:720p");
    }

    #[test]
    fn test_quality_keyboard() {
        let info = VideoInfo {
            id: "dQw4w9WgXcQ".into(),
            formats: vec![
                format("140", "none", None, None),
                format("18", "avc1", Some(360), Some(1048576)),
                format("22", "avc1", Some(720), None),
            ],
            ..Default::default()
        };

        let keyboard = youtube_quality_keyboard(&info);
        let buttons: Vec<&InlineKeyboardButton> = keyboard.inline_keyboard.iter().flatten().collect();

        assert_eq!(keyboard.inline_keyboard.len(), 2);
        assert_eq!(buttons.len(), 3);
        assert_eq!(buttons[0].text, "🎵 Audio");
        assert_eq!(callback_data(buttons[0]), "yt:dQw4w9WgXcQ:audio");
        assert_eq!(buttons[1].text, "🎬 360p (1.00 MB)");
        assert_eq!(callback_data(buttons[2]), "yt:dQw4w9WgXcQ:720p");
    }
}
