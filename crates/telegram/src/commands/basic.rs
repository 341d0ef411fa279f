//! Basic bot commands (start, help)

use crate::constants::SOURCE_URL;
use crate::types::{Command, HandlerResult};
use teloxide::{prelude::*, types::ParseMode, utils::command::BotCommands};

/// Welcome message when user starts the bot
pub async fn start(bot: Bot, msg: Message) -> HandlerResult {
    let welcome_text = format!(
        "Welcome to itisFarzin's personal assistant bot!\n\
        You can find the source code of me on <a href=\"{}\">GitHub</a>.",
        SOURCE_URL
    );

    bot.send_message(msg.chat.id, welcome_text)
        .parse_mode(ParseMode::Html)
        .disable_web_page_preview(true)
        .await?;
    Ok(())
}

/// Display help message with available commands
pub async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}
