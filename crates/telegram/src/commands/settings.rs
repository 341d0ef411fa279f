//! Plugin settings management: /setdata, /getdata, /deldata

use crate::constants::{emoji, usage};
use crate::error::{BotError, BotResult};
use crate::handlers;
use crate::types::HandlerResult;
use crate::utils;
use storage::SettingsStore;
use teloxide::prelude::*;

/// Reply text for /setdata
pub fn set_data_reply(settings: &SettingsStore, args: &str) -> BotResult<String> {
    let [plugin, key, value] = utils::split_args(args, 3)[..] else {
        return Err(BotError::InvalidArguments(usage::SET_DATA.to_string()));
    };

    settings.set(plugin, key, value)?;
    tracing::info!("Setting {}.{} updated", plugin, key);
    Ok(format!("{} Saved {}.{}", emoji::SUCCESS, plugin, key))
}

/// Reply text for /getdata
pub fn get_data_reply(settings: &SettingsStore, args: &str) -> BotResult<String> {
    match utils::parse_args(args)[..] {
        [plugin] => {
            let values = settings.list(plugin)?;
            if values.is_empty() {
                return Ok(format!("No settings stored for {}.", plugin));
            }
            let lines: Vec<String> = values
                .iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .collect();
            Ok(format!("{} {}\n{}", emoji::FOLDER, plugin, lines.join("\n")))
        }
        [plugin, key] => Ok(match settings.get(plugin, key)? {
            Some(value) => format!("{}.{}: {}", plugin, key, value),
            None => format!("{}.{} is not set.", plugin, key),
        }),
        _ => Err(BotError::InvalidArguments(usage::GET_DATA.to_string())),
    }
}

/// Reply text for /deldata
pub fn del_data_reply(settings: &SettingsStore, args: &str) -> BotResult<String> {
    let [plugin, key] = utils::parse_args(args)[..] else {
        return Err(BotError::InvalidArguments(usage::DEL_DATA.to_string()));
    };

    if settings.delete(plugin, key)? {
        Ok(format!("{} Deleted {}.{}", emoji::SUCCESS, plugin, key))
    } else {
        Ok(format!("{}.{} is not set.", plugin, key))
    }
}

async fn reply(bot: &Bot, msg: &Message, text: BotResult<String>) -> HandlerResult {
    let result = match text {
        Ok(text) => bot
            .send_message(msg.chat.id, text)
            .await
            .map(|_| ())
            .map_err(BotError::from),
        Err(err) => Err(err),
    };
    handlers::reply_on_error(bot, msg.chat.id, result).await
}

pub async fn set_data(bot: Bot, msg: Message, args: String, settings: SettingsStore) -> HandlerResult {
    let text = handlers::blocking(move || set_data_reply(&settings, &args)).await;
    reply(&bot, &msg, text).await
}

pub async fn get_data(bot: Bot, msg: Message, args: String, settings: SettingsStore) -> HandlerResult {
    let text = handlers::blocking(move || get_data_reply(&settings, &args)).await;
    reply(&bot, &msg, text).await
}

pub async fn del_data(bot: Bot, msg: Message, args: String, settings: SettingsStore) -> HandlerResult {
    let text = handlers::blocking(move || del_data_reply(&settings, &args)).await;
    reply(&bot, &msg, text).await
}
