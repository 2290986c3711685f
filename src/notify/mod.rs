//! Notification channels
//!
//! Message rendering plus the Telegram and console transports.

mod console;
mod message;
mod telegram;
mod traits;

pub use console::ConsoleNotifier;
pub use message::{escape, format_price, Message, MessageBuilder, MessageFormatter};
pub use telegram::TelegramNotifier;
pub use traits::Notifier;
