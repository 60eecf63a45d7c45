//! Minimal Telegram Bot API client: only `sendMessage` is needed

use compact_str::{CompactString, ToCompactString, format_compact};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{
    config::ClientConfig,
    error::{ClientError, Result},
};
use crate::{notifier::Notifier, result::BotError};

#[derive(Debug)]
pub struct TelegramBot {
    client: Client,
    config: ClientConfig,
    chat_id: CompactString,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Envelope every Bot API method answers with
#[derive(Debug, Deserialize)]
struct BotApiReply {
    ok: bool,
    description: Option<CompactString>,
}

impl TelegramBot {
    pub fn new(
        config: ClientConfig,
        chat_id: impl Into<CompactString>,
    ) -> std::result::Result<Self, BotError> {
        let client = Client::builder()
            .timeout(config.request.timeout)
            .build()
            .map_err(|e| BotError::ClientBuild(e.to_compact_string()))?;

        Ok(Self { client, config, chat_id: chat_id.into() })
    }

    /// Send a plain text message to the configured chat
    #[instrument(skip(self, text), fields(chat_id = %self.chat_id))]
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let url = format_compact!(
            "{}/bot{}/sendMessage",
            self.config.base_url.trim_end_matches('/'),
            self.config.token
        );

        // reqwest errors embed the URL, which carries the bot token
        let response = self
            .client
            .post(url.as_str())
            .json(&SendMessage { chat_id: &self.chat_id, text })
            .send()
            .await
            .map_err(|e| ClientError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Http(e.without_url()))?;

        match serde_json::from_str::<BotApiReply>(&body) {
            Ok(reply) if status.is_success() && reply.ok => {
                debug!(chat_id = %self.chat_id, message = text, "Message sent");
                Ok(())
            },
            Ok(reply) => Err(ClientError::telegram(
                reply
                    .description
                    .unwrap_or_else(|| format_compact!("HTTP {}", status.as_u16())),
            )),
            Err(_) if !status.is_success() => {
                Err(ClientError::status("sendMessage", status.as_u16()))
            }
            Err(e) => Err(ClientError::json_parse("sendMessage", "Failed to parse reply", e)),
        }
    }
}

impl Notifier for TelegramBot {
    async fn deliver(&self, text: &str) -> std::result::Result<(), ClientError> {
        self.send_message(text).await
    }
}
