//! Query Backend Traits
//!
//! Trait and wire types for the remote question-answering service. The
//! controller only talks to [`QueryBackend`], so tests and alternative
//! transports can stand in for the HTTP implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of `POST /chat`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The user's question, sent as typed
    pub query: String,
}

impl QueryRequest {
    /// Create a request for the given query text
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Successful body of `POST /chat`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Reply text, shown verbatim
    pub response: String,
}

/// Reasons a query produced no usable reply
#[derive(Debug, Error)]
pub enum QueryError {
    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never completed (refused, reset, timed out)
    #[error("could not reach {url}: {source}")]
    Transport {
        /// Endpoint that was called
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status
    #[error("server returned HTTP {status}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Status {
        /// Response status
        status: reqwest::StatusCode,
        /// The service's `detail` field, when it sent one
        detail: Option<String>,
    },

    /// The body was not JSON or lacked a string `response` field
    #[error("malformed response: {0}")]
    MalformedPayload(String),

    /// The query task panicked or was cancelled before producing a result
    #[error("query ended without a reply: {0}")]
    Aborted(String),
}

impl QueryError {
    /// Whether the service was reached at all
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Client(_) | Self::Transport { .. })
    }
}

/// Remote question-answering service
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Check whether the service is reachable
    async fn health_check(&self) -> bool;

    /// Send one query and wait for the complete reply
    ///
    /// Exactly one attempt is made; callers decide what a failure means.
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, QueryError>;
}
