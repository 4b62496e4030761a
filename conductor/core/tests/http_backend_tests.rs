//! HTTP backend tests against an in-process server
//!
//! The server speaks just enough HTTP/1.1 to answer one canned response per
//! connection and record what it was sent.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use assistant_conductor::{HttpBackend, QueryBackend, QueryError, QueryRequest};

/// A request as seen by the test server
#[derive(Clone, Debug, PartialEq, Eq)]
struct Recorded {
    method: String,
    path: String,
    content_type: Option<String>,
    body: String,
}

/// Canned HTTP server
struct TestServer {
    addr: std::net::SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
    shutdown: tokio::sync::oneshot::Sender<()>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a server that answers every request with `status` and `body`
    async fn start(status: &'static str, body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel();

        let seen = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    accept = listener.accept() => {
                        if let Ok((mut socket, _)) = accept {
                            let seen = Arc::clone(&seen);
                            tokio::spawn(async move {
                                if let Some(request) = read_request(&mut socket).await {
                                    seen.lock().unwrap().push(request);
                                }

                                let response = format!(
                                    "HTTP/1.1 {status}\r\n\
                                     Content-Type: application/json\r\n\
                                     Content-Length: {}\r\n\
                                     Connection: close\r\n\
                                     \r\n\
                                     {body}",
                                    body.len(),
                                );
                                let _ = socket.write_all(response.as_bytes()).await;
                            });
                        }
                    }
                }
            }
        });

        Self {
            addr,
            requests,
            shutdown: shutdown_tx,
            handle,
        }
    }

    fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    async fn shutdown(self) {
        let _ = self.shutdown.send(());
        let _ = self.handle.await;
    }
}

/// Read one request (headers plus a Content-Length body)
async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<Recorded> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let mut content_length = 0usize;
    let mut content_type = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim().to_ascii_lowercase();
            if name == "content-length" {
                content_length = value.trim().parse().unwrap_or(0);
            } else if name == "content-type" {
                content_type = Some(value.trim().to_string());
            }
        }
    }

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    Some(Recorded {
        method,
        path,
        content_type,
        body,
    })
}

fn backend_for(url: &str) -> HttpBackend {
    HttpBackend::new(url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_query_success() {
    let server = TestServer::start("200 OK", r#"{"response": "Gradient descent is..."}"#).await;
    let backend = backend_for(&server.url());

    let reply = backend
        .query(&QueryRequest::new("What is gradient descent?"))
        .await
        .unwrap();
    assert_eq!(reply.response, "Gradient descent is...");

    server.shutdown().await;
}

#[tokio::test]
async fn test_query_posts_json_to_chat() {
    let server = TestServer::start("200 OK", r#"{"response": "ok"}"#).await;
    // Trailing slash on the configured URL must not double up
    let backend = backend_for(&format!("{}/", server.url()));

    backend.query(&QueryRequest::new("  hi  ")).await.unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/chat");
    assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body, serde_json::json!({ "query": "  hi  " }));

    server.shutdown().await;
}

#[tokio::test]
async fn test_server_error_keeps_detail() {
    let server = TestServer::start(
        "500 Internal Server Error",
        r#"{"detail": "An error occurred during chat processing."}"#,
    )
    .await;
    let backend = backend_for(&server.url());

    let err = backend.query(&QueryRequest::new("hi")).await.unwrap_err();
    match &err {
        QueryError::Status { status, detail } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(
                detail.as_deref(),
                Some("An error occurred during chat processing.")
            );
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert!(!err.is_transport());

    server.shutdown().await;
}

#[tokio::test]
async fn test_missing_response_field_is_malformed() {
    let server = TestServer::start("200 OK", r#"{"answer": "wrong shape"}"#).await;
    let backend = backend_for(&server.url());

    let err = backend.query(&QueryRequest::new("hi")).await.unwrap_err();
    assert!(matches!(err, QueryError::MalformedPayload(_)), "got {err:?}");

    server.shutdown().await;
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = TestServer::start("200 OK", "not json").await;
    let backend = backend_for(&server.url());

    let err = backend.query(&QueryRequest::new("hi")).await.unwrap_err();
    assert!(matches!(err, QueryError::MalformedPayload(_)), "got {err:?}");

    server.shutdown().await;
}

#[tokio::test]
async fn test_refused_connection_is_transport_error() {
    // Grab a free port, then close it so nothing is listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = backend_for(&format!("http://{addr}"));
    let err = backend.query(&QueryRequest::new("hi")).await.unwrap_err();

    assert!(err.is_transport(), "got {err:?}");
    assert!(err.to_string().starts_with("could not reach"));
    assert!(!backend.health_check().await);
}

#[tokio::test]
async fn test_health_check_uses_root() {
    let server = TestServer::start("200 OK", r#"{"message": "ML Assistant API"}"#).await;
    let backend = backend_for(&server.url());

    assert!(backend.health_check().await);

    let requests = server.requests();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/");

    server.shutdown().await;
}

#[tokio::test]
async fn test_health_check_rejects_error_status() {
    let server = TestServer::start("503 Service Unavailable", "{}").await;
    let backend = backend_for(&server.url());

    assert!(!backend.health_check().await);

    server.shutdown().await;
}
