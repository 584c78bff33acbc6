//! Pool-manager API client.
//!
//! `GET {endpoint}/pools/{name}` describes the pool;
//! `PUT {endpoint}/pools/{name}/desired` sets a new desired count.
//! One connection per request, same transport as the metrics client.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use serde::Serialize;
use tracing::debug;

use poolscale_core::{PoolController, PoolError, PoolState};

/// Client for one named pool behind a pool-manager API.
#[derive(Debug)]
pub struct PoolApiClient {
    /// host:port of the pool manager.
    addr: String,
    /// Path prefix, usually empty.
    base_path: String,
    pool_name: String,
}

#[derive(Serialize)]
struct SetDesiredRequest {
    desired: i64,
}

impl PoolApiClient {
    /// Create a client for the pool `name` at `endpoint`, e.g.
    /// `http://pool-manager.internal:9000`.
    pub fn new(endpoint: &str, name: impl Into<String>) -> Result<Self, PoolError> {
        let (addr, base_path) = parse_endpoint(endpoint).map_err(PoolError::Endpoint)?;
        Ok(Self {
            addr,
            base_path,
            pool_name: name.into(),
        })
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<Bytes>,
    ) -> Result<Bytes, PoolError> {
        let mut builder = http::Request::builder()
            .method(method)
            .uri(path)
            .header("host", self.addr.as_str());
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let req = builder
            .body(Full::new(body.unwrap_or_default()))
            .map_err(|e| PoolError::Transport(e.to_string()))?;

        let stream = tokio::net::TcpStream::connect(&self.addr)
            .await
            .map_err(|e| PoolError::Transport(e.to_string()))?;

        let io = hyper_util::rt::TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| PoolError::Transport(e.to_string()))?;

        // Drive the connection in the background.
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| PoolError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PoolError::Status(status.as_u16()));
        }

        let body = resp
            .collect()
            .await
            .map_err(|e| PoolError::Transport(e.to_string()))?
            .to_bytes();
        Ok(body)
    }
}

impl PoolController for PoolApiClient {
    async fn describe(&self) -> Result<PoolState, PoolError> {
        let path = format!("{}/pools/{}", self.base_path, self.pool_name);
        debug!(pool = %self.pool_name, "describing pool");

        let body = self.send("GET", &path, None).await?;
        let state: PoolState =
            serde_json::from_slice(&body).map_err(|e| PoolError::Decode(e.to_string()))?;

        debug!(
            pool = %self.pool_name,
            desired = state.desired,
            min = state.min,
            max = state.max,
            "pool described"
        );
        Ok(state)
    }

    async fn set_desired_capacity(&self, count: i64) -> Result<(), PoolError> {
        let path = format!("{}/pools/{}/desired", self.base_path, self.pool_name);
        let body = serde_json::to_vec(&SetDesiredRequest { desired: count })
            .map_err(|e| PoolError::Transport(e.to_string()))?;

        debug!(pool = %self.pool_name, desired = count, "setting desired capacity");
        self.send("PUT", &path, Some(Bytes::from(body))).await?;
        Ok(())
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
