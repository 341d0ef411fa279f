//! QR code generator

use crate::constants::usage;
use crate::error::{BotError, BotResult};
use crate::handlers;
use crate::types::HandlerResult;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;
use teloxide::{prelude::*, types::InputFile};

/// Render `text` as a PNG QR code
pub fn generate_qr(text: &str) -> BotResult<Vec<u8>> {
    let code = QrCode::new(text.as_bytes())
        .map_err(|e| BotError::Message(format!("Can't encode QR code: {}", e)))?;
    let image = code.render::<Luma<u8>>().build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| BotError::Message(format!("Can't write QR image: {}", e)))?;
    Ok(png)
}

/// /qrcode <text>
pub async fn qrcode(bot: Bot, msg: Message, text: String) -> HandlerResult {
    let result = send_qrcode(&bot, &msg, &text).await;
    handlers::reply_on_error(&bot, msg.chat.id, result).await
}

async fn send_qrcode(bot: &Bot, msg: &Message, text: &str) -> BotResult<()> {
    if text.trim().is_empty() {
        return Err(BotError::InvalidArguments(usage::QRCODE.to_string()));
    }

    let png = generate_qr(text)?;
    bot.send_photo(msg.chat.id, InputFile::memory(png).file_name("qr.png"))
        .caption("Here's your QR code!")
        .reply_to_message_id(msg.id)
        .await?;
    Ok(())
}
