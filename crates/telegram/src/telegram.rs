pub use crate::config::Config;
use crate::types::Command;
use crate::{callbacks, commands};
use std::sync::Arc;
use teloxide::{dispatching::UpdateHandler, prelude::*, utils::command::BotCommands};

/// Register bot commands in Telegram menu
pub async fn set_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

/// Whether the sender of `msg` is listed in `ADMINS`
fn is_admin_message(msg: &Message, config: &Config) -> bool {
    msg.from()
        .map(|user| config.is_admin(user.id.0))
        .unwrap_or(false)
}

pub fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use dptree::case;

    // Available to everyone
    let public_commands = dptree::entry()
        .branch(case![Command::Help].endpoint(commands::help))
        .branch(case![Command::Date].endpoint(commands::date))
        .branch(case![Command::JDate].endpoint(commands::jdate));

    // Silently ignored for everyone else
    let admin_commands = dptree::filter(|msg: Message, config: Arc<Config>| {
        is_admin_message(&msg, &config)
    })
    .branch(case![Command::Start].endpoint(commands::start))
    .branch(case![Command::Weather(location)].endpoint(commands::weather))
    .branch(case![Command::Translate(args)].endpoint(commands::translate))
    .branch(case![Command::QrCode(text)].endpoint(commands::qrcode))
    .branch(case![Command::Throw(args)].endpoint(commands::throw))
    .branch(case![Command::Dice].endpoint(commands::dice))
    .branch(case![Command::Dart].endpoint(commands::dart))
    .branch(case![Command::Basketball].endpoint(commands::basketball))
    .branch(case![Command::Bowling].endpoint(commands::bowling))
    .branch(case![Command::Slot].endpoint(commands::slot))
    .branch(case![Command::Youtube(args)].endpoint(commands::youtube))
    .branch(case![Command::Download(args)].endpoint(commands::download))
    .branch(case![Command::SetData(args)].endpoint(commands::set_data))
    .branch(case![Command::GetData(args)].endpoint(commands::get_data))
    .branch(case![Command::DelData(args)].endpoint(commands::del_data));

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(public_commands)
        .branch(admin_commands);

    let message_handler = Update::filter_message().branch(command_handler);

    // Inline keyboard buttons start downloads, so they are admin-only too
    let callback_handler = Update::filter_callback_query()
        .filter(|q: CallbackQuery, config: Arc<Config>| config.is_admin(q.from.id.0))
        .endpoint(callbacks::handle_callback);

    dptree::entry()
        .branch(message_handler)
        .branch(callback_handler)
}
