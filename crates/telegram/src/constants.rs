//! Constants used throughout the telegram bot

use teloxide::types::DiceEmoji;

/// Where the bot's source code lives
pub const SOURCE_URL: &str = "https://github.com/6AMStuff/itisFarzinBot";

/// Settings plugin names
pub const DOWNLOAD_PLUGIN: &str = "download";
pub const YOUTUBE_PLUGIN: &str = "youtube";

/// Default name template for YouTube downloads
pub const DEFAULT_YOUTUBE_FILE_NAME: &str = "{artist} - {name}";

/// Name used when a URL has no usable file name
pub const FALLBACK_FILE_NAME: &str = "download";

/// Emoji/name pairs accepted by /throw
pub const DICE_EMOJIS: [(&str, &str, DiceEmoji); 6] = [
    ("dice", "🎲", DiceEmoji::Dice),
    ("dart", "🎯", DiceEmoji::Darts),
    ("basketball", "🏀", DiceEmoji::Basketball),
    ("football", "⚽", DiceEmoji::Football),
    ("bowling", "🎳", DiceEmoji::Bowling),
    ("slot", "🎰", DiceEmoji::SlotMachine),
];

/// Emoji constants for consistent UI
pub mod emoji {
    pub const SUCCESS: &str = "✅";
    pub const ERROR: &str = "❌";
    pub const FOLDER: &str = "📁";
    pub const DOWNLOAD: &str = "📥";
    pub const AUDIO: &str = "🎵";
    pub const VIDEO: &str = "🎬";
}

/// Usage messages for commands
pub mod usage {
    pub const WEATHER: &str = "Usage: /weather <location>";
    pub const TRANSLATE: &str = "Usage: /translate <language> *reply to a message";
    pub const QRCODE: &str = "Usage: /qrcode <text>";
    pub const YOUTUBE: &str = "Usage: /youtube <url or video id>";
    pub const DOWNLOAD: &str = "Usage: /download <url> [file name]";
    pub const SET_DATA: &str = "Usage: /setdata <plugin> <key> <value>";
    pub const GET_DATA: &str = "Usage: /getdata <plugin> [key]";
    pub const DEL_DATA: &str = "Usage: /deldata <plugin> <key>";
}
