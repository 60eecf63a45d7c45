//! HTTP client for the homework status API

use compact_str::{CompactString, ToCompactString};
use reqwest::{Client, RequestBuilder, Response, StatusCode, header::AUTHORIZATION};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{
    config::ClientConfig,
    error::{ClientError, Result},
};
use crate::{
    domain::StatusResponse,
    poller::StatusSource,
    result::{BotError, PollError},
};

/// Pure HTTP client for the homework status endpoint
#[derive(Debug)]
pub struct PracticumApi {
    client: Client,
    config: ClientConfig,
}

impl PracticumApi {
    pub fn new(config: ClientConfig) -> std::result::Result<Self, BotError> {
        let client = Client::builder()
            .timeout(config.request.timeout)
            .build()
            .map_err(|e| BotError::ClientBuild(e.to_compact_string()))?;

        Ok(Self { client, config })
    }

    /// Get submission statuses changed since `from_date` (unix seconds)
    #[instrument(skip(self))]
    pub async fn get_statuses(&self, from_date: i64) -> Result<StatusResponse> {
        let response = self
            .authenticated_request()
            .query(&[("from_date", from_date)])
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Create authenticated request builder
    fn authenticated_request(&self) -> RequestBuilder {
        self.client
            .get(self.config.base_url.as_str())
            .header(AUTHORIZATION, format!("OAuth {}", self.config.token))
    }

    /// Require HTTP 200 and decode the body as JSON
    async fn handle_response(&self, response: Response) -> Result<StatusResponse> {
        let url_path: CompactString = response.url().path().into();
        let status = response.status();

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), endpoint = %url_path, "Status API returned non-200");
            return Err(ClientError::status(url_path, status.as_u16()));
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body).map_err(|e| {
            debug!(endpoint = %url_path, body = %body, "Response body is not JSON");
            ClientError::json_parse(url_path.clone(), "Failed to parse response", e)
        })?;

        debug!(endpoint = %url_path, "Fetched homework statuses");
        Ok(StatusResponse::new(value))
    }
}

impl StatusSource for PracticumApi {
    async fn fetch_status(&self, from_date: i64) -> std::result::Result<StatusResponse, PollError> {
        self.get_statuses(from_date).await.map_err(|e| {
            warn!(error = %e, from_date, "Failed to fetch homework statuses");
            PollError::from(&e)
        })
    }
}
