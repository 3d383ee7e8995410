//! WebshClient - REST client for the websh API.
//!
//! Every call is a single attempt bounded by [`REQUEST_TIMEOUT`]; failures
//! are returned to the caller immediately.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{ExecuteRequest, ExecutionResult, PingResult};

pub const DEFAULT_BASE_URL: &str = "https://websh.jiro4989.com";

/// Fixed per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can run code remotely and report on its own health.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Checks that the service is reachable and healthy.
    async fn ping(&self) -> Result<PingResult, ClientError>;

    /// Runs `code` and returns its captured output.
    async fn execute(&self, code: &str) -> Result<ExecutionResult, ClientError>;
}

/// [`RemoteExecutor`] backed by the websh HTTP API.
#[derive(Debug, Clone)]
pub struct WebshClient {
    client: Client,
    base_url: String,
}

impl WebshClient {
    /// Creates a client for the public websh server.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client for the server at `base_url` (scheme and host, no path).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL of an API endpoint, e.g. `endpoint("ping")`.
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/api/{}", self.base_url, name)
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        transport: fn(reqwest::Error) -> ClientError,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ClientError::BadStatus { status });
        }

        let body = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&body).map_err(ClientError::Decode)
    }
}

#[async_trait]
impl RemoteExecutor for WebshClient {
    async fn ping(&self) -> Result<PingResult, ClientError> {
        let url = self.endpoint("ping");
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ClientError::Unreachable)?;

        Self::decode(response, ClientError::Unreachable).await
    }

    async fn execute(&self, code: &str) -> Result<ExecutionResult, ClientError> {
        let url = self.endpoint("shellgei");
        let body = serde_json::to_vec(&ExecuteRequest::new(code)).map_err(ClientError::Encode)?;
        tracing::debug!("POST {} ({} bytes)", url, body.len());

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        Self::decode(response, ClientError::Transport).await
    }
}
