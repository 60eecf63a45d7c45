use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    client::{PracticumApi, TelegramBot},
    config::BotConfig,
    logging::{LoggingConfig, init_logging},
    poller::HomeworkPoller,
    result::{BotError, Result},
};

pub type Poller = HomeworkPoller<PracticumApi, TelegramBot>;

pub struct AppComponents {
    pub poller: Poller,
    pub _log_guard: WorkerGuard,
}

/// Read configuration, install logging and wire the clients into a poller
pub fn initialize_app() -> Result<AppComponents> {
    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log_startup_failure(&e);
            return Err(e);
        }
    };
    let log_guard = init_logging(&config.logging)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Homework bot starting up");

    let poller = create_poller(config)?;

    Ok(AppComponents { poller, _log_guard: log_guard })
}

pub fn create_poller(config: BotConfig) -> Result<Poller> {
    let api = PracticumApi::new(config.practicum)?;
    let bot = TelegramBot::new(config.telegram, config.chat_id)?;

    Ok(HomeworkPoller::new(api, bot, config.locale, config.retry_period))
}

/// Install a subscriber from whatever logging settings are usable and record
/// why the bot could not start
///
/// The guard is dropped on return, which flushes the line before exit.
fn log_startup_failure(err: &BotError) {
    let logging = LoggingConfig::from_lookup(|key| std::env::var(key).ok()).unwrap_or_default();
    let guard = init_logging(&logging).or_else(|_| init_logging(&LoggingConfig::default()));
    if let Ok(_guard) = guard {
        report_startup_failure(err);
    }
}

fn report_startup_failure(err: &BotError) {
    error!(error = %err, "Homework bot failed to start");
}

#[cfg(test)]
mod tests {
    use std::{
        io::Write,
        sync::{Arc, Mutex},
    };

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn missing_configuration_is_logged_as_an_error() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let err = BotError::ConfigMissing { names: vec!["PRACTICUM_TOKEN", "TELEGRAM_CHAT_ID"] };
        tracing::subscriber::with_default(subscriber, || report_startup_failure(&err));

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("ERROR"), "{output}");
        assert!(output.contains("Homework bot failed to start"), "{output}");
        assert!(output.contains("PRACTICUM_TOKEN, TELEGRAM_CHAT_ID"), "{output}");
    }
}
