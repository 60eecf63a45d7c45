use std::str::FromStr;

use compact_str::{CompactString, ToCompactString};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::result::BotError;

/// Output format of log lines written to stdout
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `info` or `homework_bot=debug`
    pub filter: CompactString,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: "info".into(), format: LogFormat::Text }
    }
}

impl FromStr for LogFormat {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(BotError::config_validation(
                "LOG_FORMAT",
                format!("unsupported log format \"{other}\", expected text or json"),
            )),
        }
    }
}

impl LoggingConfig {
    /// Read `RUST_LOG` and `LOG_FORMAT` through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(filter) = lookup("RUST_LOG").filter(|f| !f.trim().is_empty()) {
            config.filter = filter.into();
        }

        if let Some(format) = lookup("LOG_FORMAT").filter(|f| !f.trim().is_empty()) {
            config.format = format.parse()?;
        }

        Ok(config)
    }
}

/// Install the global subscriber writing to stdout
///
/// The returned guard flushes buffered lines on drop and must be held until
/// the process exits.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard, BotError> {
    let filter = EnvFilter::try_new(config.filter.as_str())
        .map_err(|e| BotError::config_validation("RUST_LOG", e.to_string()))?;
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(writer).with_target(true))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer).with_current_span(true))
            .try_init(),
    };

    result.map_err(|e| BotError::Logging(e.to_compact_string()))?;
    Ok(guard)
}
