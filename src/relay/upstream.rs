//! Upstream client: a single POST per client request, buffered or streamed.
//!
//! # Responsibilities
//! - Send the encoded payload to `{base_url}/chat/completions`
//! - Enforce the response deadline
//! - Hand back the upstream status, headers and body unmodified
//!
//! # Design Decisions
//! - One attempt only; failures surface as `RelayError`
//! - The deadline covers status and headers only, in both modes; a body
//!   that keeps arriving is never cut off
//! - Buffered bodies are re-framed locally, so the upstream
//!   `Transfer-Encoding` is dropped

use axum::body::Body;
use axum::http::{header, HeaderMap};
use axum::response::Response;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::config::UpstreamConfig;
use crate::http::response::mirror_upstream;
use crate::observability::metrics;
use crate::relay::error::{RelayError, RelayResult};
use crate::relay::stream::{RelayStream, UpstreamLease};
use crate::relay::translator::UpstreamPayload;

/// Handle to the upstream chat-completion endpoint.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            url: config.completions_url(),
            timeout: config.timeout(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Relay the call and return the complete upstream response.
    pub async fn forward_buffered(
        &self,
        payload: &UpstreamPayload<'_>,
        headers: HeaderMap,
    ) -> RelayResult<Response> {
        let body = serde_json::to_vec(payload)?;
        let start = Instant::now();

        let upstream = self.send_with_deadline(body, headers).await?;
        metrics::record_upstream_latency("buffered", start);

        let status = upstream.status();
        let mut headers = upstream.headers().clone();
        // The body is handed over whole, so the upstream framing no longer applies.
        headers.remove(header::TRANSFER_ENCODING);
        let bytes = upstream.bytes().await.map_err(RelayError::Body)?;

        tracing::debug!(
            status = status.as_u16(),
            bytes = bytes.len(),
            "Buffered upstream response received"
        );
        Ok(mirror_upstream(status, headers, Body::from(bytes)))
    }

    /// Open the upstream stream and return a response that relays it.
    ///
    /// `lease` is released when the returned body finishes or is dropped,
    /// or right here if the upstream never answers.
    pub async fn open_stream(
        &self,
        payload: &UpstreamPayload<'_>,
        headers: HeaderMap,
        lease: UpstreamLease,
    ) -> RelayResult<Response> {
        let body = serde_json::to_vec(payload)?;
        let start = Instant::now();

        let upstream = self.send_with_deadline(body, headers).await?;
        metrics::record_upstream_latency("stream", start);

        let status = upstream.status();
        let headers = upstream.headers().clone();
        tracing::debug!(
            request_id = %lease.request_id(),
            status = status.as_u16(),
            "Upstream stream opened"
        );

        let relay = RelayStream::new(upstream.bytes_stream(), lease);
        Ok(mirror_upstream(status, headers, Body::from_stream(relay)))
    }

    /// Send the request and wait for status and headers, within the deadline.
    async fn send_with_deadline(
        &self,
        body: Vec<u8>,
        headers: HeaderMap,
    ) -> RelayResult<reqwest::Response> {
        timeout(self.timeout, self.send(body, headers))
            .await
            .map_err(|_| RelayError::Timeout(self.timeout.as_secs()))?
    }

    async fn send(&self, body: Vec<u8>, headers: HeaderMap) -> RelayResult<reqwest::Response> {
        self.client
            .post(&self.url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RelayError::Timeout(self.timeout.as_secs())
                } else {
                    RelayError::Connect(e)
                }
            })
    }
}
