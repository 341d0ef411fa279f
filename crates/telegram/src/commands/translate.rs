//! Translate the replied message

use crate::constants::usage;
use crate::error::{BotError, BotResult};
use crate::handlers;
use crate::types::HandlerResult;
use crate::utils;
use clients::Translator;
use teloxide::prelude::*;

/// /translate <language> as a reply to the message to translate
pub async fn translate(
    bot: Bot,
    msg: Message,
    args: String,
    translator: Translator,
) -> HandlerResult {
    let result = send_translation(&bot, &msg, &args, &translator).await;
    handlers::reply_on_error(&bot, msg.chat.id, result).await
}

async fn send_translation(
    bot: &Bot,
    msg: &Message,
    args: &str,
    translator: &Translator,
) -> BotResult<()> {
    let language = match utils::parse_args(args).first() {
        Some(language) => language.to_string(),
        None => return Err(BotError::InvalidArguments(usage::TRANSLATE.to_string())),
    };

    let replied = msg
        .reply_to_message()
        .ok_or_else(|| BotError::Message("Reply to a message.".to_string()))?;

    let text = replied
        .text()
        .or_else(|| replied.caption())
        .unwrap_or_default();

    let translation = translator.translate(text, &language).await?;
    bot.send_message(
        msg.chat.id,
        format!(
            "From {} to {}:\n{}",
            translation.src, translation.dest, translation.text
        ),
    )
    .await?;
    Ok(())
}
