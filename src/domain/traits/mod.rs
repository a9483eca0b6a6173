//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod store;
pub mod weather;

pub use bot::{Bot, BotInfo, KeyboardButton, ReplyMarkup};
pub use store::RequestLog;
pub use weather::WeatherProvider;
