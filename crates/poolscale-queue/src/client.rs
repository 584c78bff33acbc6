//! Agent metrics HTTP client.
//!
//! Issues `GET {endpoint}/metrics` with a token Authorization header
//! and decodes the per-queue job counts from the JSON response. One
//! connection per request; transport timeouts and TLS termination
//! belong to the surrounding deployment, not this client.

use std::collections::HashMap;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use serde::Deserialize;
use tracing::{debug, info};

use poolscale_core::{QueueError, QueueMetrics};

/// Client for the agent metrics endpoint.
#[derive(Debug)]
pub struct AgentMetricsClient {
    /// host:port of the metrics endpoint.
    addr: String,
    /// Path prefix, e.g. "/v3".
    base_path: String,
    token: String,
    user_agent: String,
}

impl AgentMetricsClient {
    /// Create a client for `endpoint`, e.g. `http://metrics.internal:8080/v3`.
    ///
    /// Only plain `http` endpoints are accepted; an `https` endpoint
    /// needs a TLS-terminating proxy in front of this client.
    pub fn new(endpoint: &str, token: impl Into<String>) -> Result<Self, QueueError> {
        let (addr, base_path) = parse_endpoint(endpoint).map_err(QueueError::Endpoint)?;
        Ok(Self {
            addr,
            base_path,
            token: token.into(),
            user_agent: format!("poolscale/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Override the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    async fn fetch_metrics(&self) -> Result<MetricsResponse, QueueError> {
        let path = format!("{}/metrics", self.base_path);
        let auth = format!("Token {}", self.token);

        let req = http::Request::builder()
            .method("GET")
            .uri(path.as_str())
            .header("host", self.addr.as_str())
            .header("user-agent", self.user_agent.as_str())
            .header("authorization", auth.as_str())
            .body(Empty::<Bytes>::new())
            .map_err(|e| QueueError::Transport(e.to_string()))?;

        let stream = tokio::net::TcpStream::connect(&self.addr)
            .await
            .map_err(|e| QueueError::Transport(e.to_string()))?;

        let io = hyper_util::rt::TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| QueueError::Transport(e.to_string()))?;

        // Drive the connection in the background.
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| QueueError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(QueueError::Status(status.as_u16()));
        }

        let body = resp
            .collect()
            .await
            .map_err(|e| QueueError::Transport(e.to_string()))?
            .to_bytes();

        serde_json::from_slice(&body).map_err(|e| QueueError::Decode(e.to_string()))
    }
}

impl QueueMetrics for AgentMetricsClient {
    async fn scheduled_count(&self, queue: &str) -> Result<i64, QueueError> {
        debug!(%queue, addr = %self.addr, "collecting agent metrics");
        let started = Instant::now();

        let metrics = self.fetch_metrics().await?;

        // A queue with no agents and no jobs is simply absent from
        // the response.
        let count = metrics
            .jobs
            .queues
            .get(queue)
            .map(|q| q.scheduled)
            .unwrap_or(0);

        if count > 0 {
            info!(
                %queue,
                scheduled = count,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "found scheduled jobs"
            );
        } else {
            debug!(
                %queue,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "no scheduled jobs"
            );
        }

        Ok(count)
    }
}

/// Split an http endpoint URI into (host:port, path prefix).
fn parse_endpoint(endpoint: &str) -> Result<(String, String), String> {
    let uri: http::Uri = endpoint
        .parse()
        .map_err(|e: http::uri::InvalidUri| e.to_string())?;

    match uri.scheme_str() {
        Some("http") | None => {}
        Some(other) => {
            return Err(format!("unsupported scheme {other:?}, only http is supported"));
        }
    }

    let host = uri.host().ok_or_else(|| "missing host".to_string())?;
    let port = uri.port_u16().unwrap_or(80);
    let base_path = uri.path().trim_end_matches('/').to_string();

    Ok((format!("{host}:{port}"), base_path))
}

#[derive(Debug, Deserialize)]
struct MetricsResponse {
    #[serde(default)]
    jobs: JobMetrics,
}

#[derive(Debug, Deserialize, Default)]
struct JobMetrics {
    #[serde(default)]
    queues: HashMap<String, QueueJobCounts>,
}

#[derive(Debug, Deserialize)]
struct QueueJobCounts {
    #[serde(default)]
    scheduled: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;

    async fn serve(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn metrics_body() -> &'static str {
        r#"{
            "jobs": {
                "queues": {
                    "default": {"scheduled": 12, "running": 3, "waiting": 1},
                    "deploy": {"scheduled": 0, "running": 0}
                }
            },
            "agents": {"idle": 2, "busy": 3}
        }"#
    }

    async fn metrics_server() -> SocketAddr {
        serve(Router::new().route(
            "/v3/metrics",
            get(|headers: HeaderMap| async move {
                match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                    Some("Token secret") => (StatusCode::OK, metrics_body()),
                    _ => (StatusCode::UNAUTHORIZED, ""),
                }
            }),
        ))
        .await
    }

    #[tokio::test]
    async fn reads_scheduled_count_for_queue() {
        let addr = metrics_server().await;
        let client = AgentMetricsClient::new(&format!("http://{addr}/v3"), "secret").unwrap();

        assert_eq!(client.scheduled_count("default").await.unwrap(), 12);
        assert_eq!(client.scheduled_count("deploy").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_queue_is_zero_not_error() {
        let addr = metrics_server().await;
        let client = AgentMetricsClient::new(&format!("http://{addr}/v3"), "secret").unwrap();

        assert_eq!(client.scheduled_count("no-such-queue").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn bad_token_surfaces_status() {
        let addr = metrics_server().await;
        let client = AgentMetricsClient::new(&format!("http://{addr}/v3"), "wrong").unwrap();

        let err = client.scheduled_count("default").await.unwrap_err();
        assert!(matches!(err, QueueError::Status(401)));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let addr = serve(Router::new().route(
            "/v3/metrics",
            get(|| async { "not json at all" }),
        ))
        .await;
        let client = AgentMetricsClient::new(&format!("http://{addr}/v3"), "secret").unwrap();

        let err = client.scheduled_count("default").await.unwrap_err();
        assert!(matches!(err, QueueError::Decode(_)));
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = AgentMetricsClient::new(&format!("http://{addr}/v3"), "secret").unwrap();
        let err = client.scheduled_count("default").await.unwrap_err();
        assert!(matches!(err, QueueError::Transport(_)));
    }

    #[tokio::test]
    async fn sends_user_agent() {
        let addr = serve(Router::new().route(
            "/v3/metrics",
            get(|headers: HeaderMap| async move {
                let ua = headers
                    .get("user-agent")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("");
                if ua == "test-scaler/1.0" {
                    (StatusCode::OK, r#"{"jobs":{"queues":{}}}"#)
                } else {
                    (StatusCode::BAD_REQUEST, "")
                }
            }),
        ))
        .await;

        let client = AgentMetricsClient::new(&format!("http://{addr}/v3"), "secret")
            .unwrap()
            .with_user_agent("test-scaler/1.0");
        assert_eq!(client.scheduled_count("default").await.unwrap(), 0);
    }

    #[test]
    fn rejects_https_endpoint() {
        let err = AgentMetricsClient::new("https://agent.example.com/v3", "secret").unwrap_err();
        assert!(matches!(err, QueueError::Endpoint(_)));
    }

    #[test]
    fn parse_endpoint_defaults_port_and_trims_path() {
        let (addr, path) = parse_endpoint("http://metrics.internal/v3/").unwrap();
        assert_eq!(addr, "metrics.internal:80");
        assert_eq!(path, "/v3");

        let (addr, path) = parse_endpoint("http://127.0.0.1:8080").unwrap();
        assert_eq!(addr, "127.0.0.1:8080");
        assert_eq!(path, "");
    }
}
