use compact_str::{CompactString, ToCompactString};
use thiserror::Error;

use crate::client::ClientError;

pub type Result<T> = std::result::Result<T, BotError>;

/// Fatal startup errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BotError {
    #[error("Missing required environment variables: {}", .names.join(", "))]
    ConfigMissing { names: Vec<&'static str> },

    #[error("Invalid configuration: {field}: {message}")]
    ConfigValidation { field: CompactString, message: CompactString },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(CompactString),

    #[error("Failed to initialize logging: {0}")]
    Logging(CompactString),
}

impl BotError {
    /// Create a configuration validation error
    pub fn config_validation(
        field: impl Into<CompactString>,
        message: impl Into<CompactString>,
    ) -> Self {
        Self::ConfigValidation { field: field.into(), message: message.into() }
    }
}

/// Everything that can go wrong inside one poll iteration
///
/// Values are compared structurally to decide whether an operator report
/// would repeat the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("Request to the status API failed with HTTP {status}")]
    RequestStatus { status: u16 },

    #[error("Request to the status API failed: {message}")]
    RequestTransport { message: CompactString },

    #[error("Failed to decode the status API response: {message}")]
    Decode { message: CompactString },

    #[error("Malformed status API response: {0}")]
    Schema(#[from] SchemaViolation),

    #[error("Unknown work status: {code}")]
    UnknownStatus { code: CompactString },
}

/// Ways a decoded response can fail the expected shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("response is not a JSON object")]
    NotAnObject,
    #[error("key \"homeworks\" is missing")]
    HomeworksMissing,
    #[error("key \"homeworks\" is not a list")]
    HomeworksNotList,
    #[error("no submissions in \"homeworks\"")]
    NoSubmissions,
    #[error("submission is not a JSON object")]
    SubmissionNotAnObject,
    #[error("key \"{0}\" is missing from the submission")]
    MissingKey(&'static str),
    #[error("key \"{0}\" has an unexpected type")]
    InvalidType(&'static str),
}

impl From<&ClientError> for PollError {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::Status { status, .. } => PollError::RequestStatus { status: *status },
            ClientError::Http(e) => PollError::RequestTransport { message: describe_transport(e) },
            ClientError::JsonParse { message, source, .. } => PollError::Decode {
                message: format!("{message}: {source}").into(),
            },
            ClientError::Telegram { description } => {
                PollError::RequestTransport { message: description.clone() }
            },
        }
    }
}

/// Name the failure kind and every underlying cause, leaving out the URL
///
/// The URL carries the moving `from_date` cursor, so keeping it would make
/// otherwise identical failures compare unequal.
fn describe_transport(err: &reqwest::Error) -> CompactString {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else if err.is_body() || err.is_decode() {
        "failed to read the response body"
    } else {
        "request failed"
    };

    let mut message = CompactString::from(kind);
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        let cause_text = cause.to_compact_string();
        if !message.ends_with(cause_text.as_str()) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

impl From<ClientError> for PollError {
    fn from(err: ClientError) -> Self {
        PollError::from(&err)
    }
}
