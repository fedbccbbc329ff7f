//! Cloud Monitoring `timeSeries:query` client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::QueryClient;
use crate::config::Config;
use crate::error::{MqliError, Result};
use crate::monitoring::{QueryRequest, QueryResponse};
use crate::status::{normalize_error, ErrorEnvelope};

/// HTTP client for the Monitoring API.
#[derive(Debug, Clone)]
pub struct MonitoringClient {
    client: Client,
    url: Url,
    token: String,
}

impl MonitoringClient {
    /// Creates a client for the configured project and endpoint.
    pub fn new(config: &Config, token: impl Into<String>) -> Result<Self> {
        Self::with_url(config.query_url()?, token, config.timeout())
    }

    /// Creates a client that posts queries to `url`.
    pub fn with_url(url: Url, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MqliError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url,
            token: token.into(),
        })
    }

    /// Returns the query URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Converts a failed response into an error.
    ///
    /// Structured API errors go through the normalizer. Other bodies are
    /// reported with their status.
    fn parse_error(status: StatusCode, body: &str) -> MqliError {
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
            debug!(
                "API error {} ({})",
                envelope.error.code,
                envelope.error.status.as_deref().unwrap_or("UNKNOWN")
            );
            return MqliError::query(normalize_error(&envelope.error));
        }

        let body = body.trim();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                MqliError::auth(format!("HTTP {}: {}", status, body))
            }
            _ => MqliError::query(format!("HTTP {}: {}", status, body)),
        }
    }

    fn request_error(error: reqwest::Error) -> MqliError {
        if error.is_timeout() {
            MqliError::connection(format!("Request timed out: {}", error))
        } else {
            MqliError::connection(error.to_string())
        }
    }
}

#[async_trait]
impl QueryClient for MonitoringClient {
    async fn query_page(&self, query: &str, page_token: Option<&str>) -> Result<QueryResponse> {
        let request = QueryRequest { query, page_token };
        debug!("POST {}", self.url);

        let response = self
            .client
            .post(self.url.clone())
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(Self::request_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MqliError::connection(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Self::parse_error(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| MqliError::internal(format!("Failed to parse response: {}", e)))
    }
}
