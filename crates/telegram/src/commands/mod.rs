//! Command handlers for the Telegram bot
//!
//! This module contains all command handler functions organized by plugin:
//! - `basic`: start and help
//! - `date`: Gregorian and Jalali date
//! - `weather`, `translate`, `qrcode`, `throw`: utility plugins
//! - `youtube`, `download`: media downloads
//! - `settings`: plugin settings management

mod basic;
mod date;
mod download;
mod qrcode;
mod settings;
mod throw;
mod translate;
mod weather;
mod youtube;

pub use basic::*;
pub use date::*;
pub use download::*;
pub use qrcode::*;
pub use settings::*;
pub use throw::*;
pub use translate::*;
pub use weather::*;
pub use youtube::*;
