//! Animated dice emojis

use crate::constants::DICE_EMOJIS;
use crate::types::HandlerResult;
use crate::utils;
use teloxide::{prelude::*, types::DiceEmoji, types::ParseMode};

/// Resolve a dice name (`dart`) or emoji (`🎯`)
pub fn resolve_dice(value: &str) -> Option<DiceEmoji> {
    // emoji may carry a variation selector
    let value = value.trim().trim_end_matches('\u{fe0f}');
    DICE_EMOJIS
        .iter()
        .find(|(name, emoji, _)| value.eq_ignore_ascii_case(name) || value == *emoji)
        .map(|(_, _, dice)| *dice)
}

fn valid_emojis_text() -> String {
    let list = DICE_EMOJIS
        .iter()
        .map(|(_, emoji, _)| format!("`{}`", emoji))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{}{}{}",
        utils::escape_markdown_v2("The emoji should be one of the following: "),
        list,
        utils::escape_markdown_v2(".")
    )
}

async fn send_dice(bot: &Bot, msg: &Message, dice: DiceEmoji) -> HandlerResult {
    bot.send_dice(msg.chat.id).emoji(dice).await?;
    Ok(())
}

/// /throw <emoji or name>
pub async fn throw(bot: Bot, msg: Message, args: String) -> HandlerResult {
    match resolve_dice(&args) {
        Some(dice) => send_dice(&bot, &msg, dice).await,
        None => {
            bot.send_message(msg.chat.id, valid_emojis_text())
                .parse_mode(ParseMode::MarkdownV2)
                .await?;
            Ok(())
        }
    }
}

pub async fn dice(bot: Bot, msg: Message) -> HandlerResult {
    send_dice(&bot, &msg, DiceEmoji::Dice).await
}

pub async fn dart(bot: Bot, msg: Message) -> HandlerResult {
    send_dice(&bot, &msg, DiceEmoji::Darts).await
}

pub async fn basketball(bot: Bot, msg: Message) -> HandlerResult {
    send_dice(&bot, &msg, DiceEmoji::Basketball).await
}

pub async fn bowling(bot: Bot, msg: Message) -> HandlerResult {
    send_dice(&bot, &msg, DiceEmoji::Bowling).await
}

pub async fn slot(bot: Bot, msg: Message) -> HandlerResult {
    send_dice(&bot, &msg, DiceEmoji::SlotMachine).await
}
