//! HTTP Backend Implementation
//!
//! Talks to the question-answering service over plain JSON HTTP.
//!
//! # Service API
//!
//! - `POST /chat` with `{"query": "..."}` returns `{"response": "..."}`
//! - `GET /` answers 2xx while the service is up
//!
//! Failed requests come back as `{"detail": "..."}` with a non-2xx status;
//! the detail is kept for the error description.

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{QueryBackend, QueryError, QueryRequest, QueryResponse};
use crate::config::ApiConfig;

/// Default service address for local development
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// JSON-over-HTTP backend client
#[derive(Clone, Debug)]
pub struct HttpBackend {
    /// Base URL without trailing slash
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, QueryError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(QueryError::Client)?;

        Ok(Self {
            base_url: normalize_base_url(&base_url.into()),
            http_client,
        })
    }

    /// Create from the `[api]` configuration section
    pub fn from_config(config: &ApiConfig) -> Result<Self, QueryError> {
        Self::new(config.base_url.clone(), config.timeout)
    }

    /// Base URL the backend talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get chat endpoint URL
    fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url)
    }

    /// Get root (health) endpoint URL
    fn root_url(&self) -> String {
        format!("{}/", self.base_url)
    }
}

#[async_trait]
impl QueryBackend for HttpBackend {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(self.root_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Health check failed");
                false
            }
        }
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, QueryError> {
        let url = self.chat_url();

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|source| QueryError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| QueryError::Transport { url, source })?;

        if !status.is_success() {
            return Err(QueryError::Status {
                status,
                detail: error_detail(&body),
            });
        }

        serde_json::from_slice::<QueryResponse>(&body)
            .map_err(|e| QueryError::MalformedPayload(e.to_string()))
    }
}

/// Strip trailing slashes so endpoint paths join cleanly
fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Pull the `detail` string out of an error body, if there is one
fn error_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}
