//! Weather report command

use crate::constants::usage;
use crate::error::{BotError, BotResult};
use crate::handlers;
use crate::types::HandlerResult;
use clients::WeatherApi;
use teloxide::prelude::*;

pub const UNKNOWN_LOCATION: &str = "Couldn't find the country/region/state.";

/// Current weather for a location: /weather <location>
pub async fn weather(bot: Bot, msg: Message, location: String, api: WeatherApi) -> HandlerResult {
    let result = send_weather(&bot, &msg, location.trim(), &api).await;
    handlers::reply_on_error(&bot, msg.chat.id, result).await
}

async fn send_weather(bot: &Bot, msg: &Message, location: &str, api: &WeatherApi) -> BotResult<()> {
    if location.is_empty() {
        return Err(BotError::InvalidArguments(usage::WEATHER.to_string()));
    }

    let text = match api.lookup(location).await? {
        Some(report) => handlers::format_weather(&report),
        None => UNKNOWN_LOCATION.to_string(),
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}
