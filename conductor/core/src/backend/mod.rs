//! Question-Answering Backend
//!
//! Abstracted access to the remote service that answers user turns.
//!
//! # Available Backends
//!
//! - **HTTP**: JSON over HTTP (`POST {base_url}/chat`)
//!
//! # Usage
//!
//! ```ignore
//! use assistant_conductor::backend::{HttpBackend, QueryBackend, QueryRequest};
//!
//! let backend = HttpBackend::new("http://localhost:8000", Duration::from_secs(120))?;
//! let reply = backend.query(&QueryRequest::new("What is gradient descent?")).await?;
//! ```

mod http;
mod traits;

pub use http::{HttpBackend, DEFAULT_BASE_URL};
pub use traits::{QueryBackend, QueryError, QueryRequest, QueryResponse};
