//! Error types for the HTTP clients

use compact_str::CompactString;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors raised by the status API and Telegram clients
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {endpoint}")]
    Status { endpoint: CompactString, status: u16 },

    #[error("Failed to parse JSON from {endpoint}: {message}")]
    JsonParse {
        endpoint: CompactString,
        message: CompactString,
        #[source]
        source: serde_json::Error,
    },

    #[error("Telegram API refused the message: {description}")]
    Telegram { description: CompactString },
}

impl ClientError {
    pub fn status(endpoint: impl Into<CompactString>, status: u16) -> Self {
        Self::Status { endpoint: endpoint.into(), status }
    }

    pub fn json_parse(
        endpoint: impl Into<CompactString>,
        message: impl Into<CompactString>,
        source: serde_json::Error,
    ) -> Self {
        Self::JsonParse {
            endpoint: endpoint.into(),
            message: message.into(),
            source,
        }
    }

    pub fn telegram(description: impl Into<CompactString>) -> Self {
        Self::Telegram { description: description.into() }
    }
}
