//! HTTP clients for the homework status API and the Telegram Bot API

pub mod api;
pub mod config;
pub mod error;
pub mod telegram;

pub use api::PracticumApi;
pub use config::ClientConfig;
pub use error::ClientError;
pub use telegram::TelegramBot;
