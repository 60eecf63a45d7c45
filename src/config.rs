use std::time::Duration;

use compact_str::CompactString;

use crate::{
    client::{ClientConfig, config::RequestConfig},
    logging::LoggingConfig,
    result::{BotError, Result},
    verdict::Locale,
};

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_RETRY_PERIOD: Duration = Duration::from_secs(600);

const REQUIRED: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

/// Everything the bot reads from the environment at startup
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Homework status endpoint and its OAuth token
    pub practicum: ClientConfig,
    /// Telegram Bot API root and bot token
    pub telegram: ClientConfig,
    /// Destination chat for every message
    pub chat_id: CompactString,
    /// Pause between poll iterations
    pub retry_period: Duration,
    pub locale: Locale,
    pub logging: LoggingConfig,
}

impl BotConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self> {
        check_env_file(dotenvy::dotenv())?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    ///
    /// Every missing required variable is reported at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let missing: Vec<&'static str> =
            REQUIRED.into_iter().filter(|&key| read(key).is_none()).collect();
        if !missing.is_empty() {
            return Err(BotError::ConfigMissing { names: missing });
        }

        let [practicum_token, telegram_token, chat_id] =
            REQUIRED.map(|key| read(key).unwrap_or_default());

        let timeout = match read("REQUEST_TIMEOUT") {
            Some(value) => parse_seconds("REQUEST_TIMEOUT", &value)?,
            None => RequestConfig::default().timeout,
        };
        let retry_period = match read("RETRY_PERIOD") {
            Some(value) => parse_seconds("RETRY_PERIOD", &value)?,
            None => DEFAULT_RETRY_PERIOD,
        };
        let locale = match read("BOT_LOCALE") {
            Some(value) => value.parse()?,
            None => Locale::default(),
        };

        let practicum = ClientConfig::new(
            read("PRACTICUM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            practicum_token,
        )
        .with_timeout(timeout);
        practicum.validate("PRACTICUM_ENDPOINT", "PRACTICUM_TOKEN")?;

        let telegram = ClientConfig::new(
            read("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            telegram_token,
        )
        .with_timeout(timeout);
        telegram.validate("TELEGRAM_API_URL", "TELEGRAM_TOKEN")?;

        Ok(Self {
            practicum,
            telegram,
            chat_id: chat_id.into(),
            retry_period,
            locale,
            logging: LoggingConfig::from_lookup(&lookup)?,
        })
    }
}

/// A missing `.env` is the normal case in production; an unreadable or
/// malformed one is a startup error.
fn check_env_file<T>(loaded: dotenvy::Result<T>) -> Result<()> {
    match loaded {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(BotError::config_validation(".env", e.to_string())),
    }
}

fn parse_seconds(field: &str, value: &str) -> Result<Duration> {
    match value.parse::<u64>() {
        Ok(0) => Err(BotError::config_validation(field, "must be greater than zero")),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(BotError::config_validation(
            field,
            format!("expected a whole number of seconds, got \"{value}\""),
        )),
    }
}
