use teloxide::macros::BotCommands;

/// Type alias for handler result types
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Available bot commands
///
/// Commands carrying a `String` receive everything after the command name,
/// which may be empty.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "Welcome message")]
    Start,
    #[command(description = "Display help information")]
    Help,
    #[command(description = "Current date and time")]
    Date,
    #[command(description = "Current date in the Jalali calendar")]
    JDate,
    #[command(description = "Weather report: /weather <location>")]
    Weather(String),
    #[command(description = "Translate the replied message: /translate <language>")]
    Translate(String),
    #[command(description = "Make a QR code: /qrcode <text>")]
    QrCode(String),
    #[command(description = "Throw an animated emoji: /throw <emoji or name>")]
    Throw(String),
    #[command(description = "Roll a dice")]
    Dice,
    #[command(description = "Throw a dart")]
    Dart,
    #[command(description = "Shoot a basketball")]
    Basketball,
    #[command(description = "Go bowling")]
    Bowling,
    #[command(description = "Spin the slot machine")]
    Slot,
    #[command(description = "Download from YouTube: /youtube <url>")]
    Youtube(String),
    #[command(description = "Download a file: /download <url> [name]")]
    Download(String),
    #[command(description = "Store a setting: /setdata <plugin> <key> <value>")]
    SetData(String),
    #[command(description = "Show settings: /getdata <plugin> [key]")]
    GetData(String),
    #[command(description = "Delete a setting: /deldata <plugin> <key>")]
    DelData(String),
}
