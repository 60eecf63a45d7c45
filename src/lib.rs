//! Polls the homework review status API and reports status changes of the
//! newest submission to a Telegram chat.

pub mod app_init;
pub mod client;
pub mod config;
pub mod domain;
pub mod logging;
pub mod notifier;
pub mod poller;
pub mod result;
pub mod verdict;

pub use config::BotConfig;
pub use poller::{HomeworkPoller, LoopState, StatusSource};
pub use result::{BotError, PollError};
