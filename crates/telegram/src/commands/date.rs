//! Date commands

use crate::config::Config;
use crate::handlers;
use crate::types::HandlerResult;
use chrono::Utc;
use std::sync::Arc;
use teloxide::prelude::*;

pub async fn date(bot: Bot, msg: Message, config: Arc<Config>) -> HandlerResult {
    let now = Utc::now().with_timezone(&config.timezone);
    bot.send_message(msg.chat.id, handlers::format_date(&now))
        .await?;
    Ok(())
}

/// Date in the Jalali calendar
pub async fn jdate(bot: Bot, msg: Message, config: Arc<Config>) -> HandlerResult {
    let now = Utc::now().with_timezone(&config.timezone);
    bot.send_message(msg.chat.id, handlers::format_jdate(&now))
        .await?;
    Ok(())
}
