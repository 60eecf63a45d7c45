//! Configuration shared by the HTTP clients

use std::time::Duration;

use compact_str::CompactString;

use crate::result::{BotError, Result};

/// Connection settings for one remote service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Endpoint or API root URL
    pub base_url: CompactString,
    /// Credential sent with every request
    pub token: CompactString,
    /// Request configuration
    pub request: RequestConfig,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Request timeout
    pub timeout: Duration,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30) }
    }
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<CompactString>, token: impl Into<CompactString>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            request: RequestConfig::default(),
        }
    }

    /// Validate the configuration
    ///
    /// `url_field` and `token_field` name the environment variables holding
    /// the URL and the token so errors point the operator at the right place.
    pub fn validate(&self, url_field: &str, token_field: &str) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(BotError::config_validation(url_field, "URL cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(BotError::config_validation(
                url_field,
                "URL must start with http:// or https://",
            ));
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err(BotError::config_validation(url_field, "URL is not a valid URL format"));
        }

        if self.token.is_empty() {
            return Err(BotError::config_validation(token_field, "token cannot be empty"));
        }

        if self.request.timeout.is_zero() {
            return Err(BotError::config_validation(
                "REQUEST_TIMEOUT",
                "Timeout must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_URL: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

    fn field_of(err: BotError) -> CompactString {
        match err {
            BotError::ConfigValidation { field, .. } => field,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_https_url() {
        let config = ClientConfig::new(STATUS_URL, "y0_token");
        assert!(config.validate("PRACTICUM_ENDPOINT", "PRACTICUM_TOKEN").is_ok());
    }

    #[test]
    fn rejects_non_http_scheme() {
        let config = ClientConfig::new("ftp://example.com", "token");
        let err = config.validate("PRACTICUM_ENDPOINT", "PRACTICUM_TOKEN").unwrap_err();
        assert_eq!(field_of(err), "PRACTICUM_ENDPOINT");
    }

    #[test]
    fn rejects_zero_timeout() {
        let config =
            ClientConfig::new("http://localhost:8080", "token").with_timeout(Duration::ZERO);
        let err = config.validate("TELEGRAM_API_URL", "TELEGRAM_TOKEN").unwrap_err();
        assert_eq!(field_of(err), "REQUEST_TIMEOUT");
    }

    #[test]
    fn empty_token_is_reported_under_the_token_variable() {
        let config = ClientConfig::new("http://localhost:8080", "");
        let err = config.validate("TELEGRAM_API_URL", "TELEGRAM_TOKEN").unwrap_err();
        assert_eq!(field_of(err), "TELEGRAM_TOKEN");
    }
}
