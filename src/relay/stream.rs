//! Streaming relay: one-pass forwarding of upstream body chunks.
//!
//! # Responsibilities
//! - Wrap the upstream byte stream in a body the client can consume
//! - Forward each chunk as soon as it is polled, in order
//! - Release upstream resources exactly once on every exit path
//!
//! # Data Flow
//! ```text
//! handler acquires UpstreamLease            (Idle → Connecting)
//!     → upstream responds, RelayStream::new  (Connecting → Streaming)
//!     → chunks polled by hyper               (Streaming)
//!     → EOF | upstream error | client drop   (Closed | Failed | Cancelled)
//!     → inner stream dropped, lease dropped  (release, once)
//! ```
//!
//! # Design Decisions
//! - Release is `Drop` on the lease, so early returns and panics are covered
//! - The upstream stream is dropped before the lease fires, closing the
//!   connection first
//! - No idle timeout between chunks

use axum::body::Bytes;
use futures_util::stream::{BoxStream, Stream, StreamExt, TryStreamExt};
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use crate::observability::metrics;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why an upstream lease was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseReason {
    /// Released before any body was relayed (connect failure, encode error).
    NotStarted,
    /// Upstream closed the stream normally.
    Completed,
    /// Upstream failed mid-stream.
    Failed,
    /// The client went away before the stream finished.
    Cancelled,
}

impl ReleaseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseReason::NotStarted => "not_started",
            ReleaseReason::Completed => "completed",
            ReleaseReason::Failed => "failed",
            ReleaseReason::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ReleaseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type ReleaseHook = Box<dyn FnOnce(ReleaseReason) + Send>;

/// Scope guard for one streamed upstream exchange.
///
/// Acquired before the upstream request is sent. Dropping it releases the
/// exchange; since `Drop` runs once, so does the release.
pub struct UpstreamLease {
    request_id: String,
    reason: ReleaseReason,
    chunks: u64,
    bytes: u64,
    acquired_at: Instant,
    on_release: Option<ReleaseHook>,
}

impl UpstreamLease {
    pub fn acquire(request_id: impl Into<String>) -> Self {
        metrics::stream_opened();
        Self {
            request_id: request_id.into(),
            reason: ReleaseReason::NotStarted,
            chunks: 0,
            bytes: 0,
            acquired_at: Instant::now(),
            on_release: None,
        }
    }

    /// Run `hook` with the release reason when the lease is released.
    pub fn on_release<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(ReleaseReason) + Send + 'static,
    {
        self.on_release = Some(Box::new(hook));
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    fn mark_streaming(&mut self) {
        // From here on, a drop without an explicit outcome means the body was abandoned.
        self.reason = ReleaseReason::Cancelled;
    }

    fn record_chunk(&mut self, len: usize) {
        self.chunks += 1;
        self.bytes += len as u64;
    }

    fn release(mut self, reason: ReleaseReason) {
        self.reason = reason;
    }
}

impl Drop for UpstreamLease {
    fn drop(&mut self) {
        tracing::debug!(
            request_id = %self.request_id,
            reason = %self.reason,
            chunks = self.chunks,
            bytes = self.bytes,
            elapsed_ms = self.acquired_at.elapsed().as_millis() as u64,
            "Upstream stream released"
        );
        metrics::stream_released(self.reason.as_str());
        if let Some(hook) = self.on_release.take() {
            hook(self.reason);
        }
    }
}

impl fmt::Debug for UpstreamLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamLease")
            .field("request_id", &self.request_id)
            .field("reason", &self.reason)
            .field("chunks", &self.chunks)
            .field("bytes", &self.bytes)
            .finish()
    }
}

/// Lazy, finite, non-restartable sequence of upstream body chunks.
///
/// Once it has yielded an error or reached the end it only yields `None`.
pub struct RelayStream {
    // Declared before `lease` so the upstream connection closes first on drop.
    inner: Option<BoxStream<'static, Result<Bytes, BoxError>>>,
    lease: Option<UpstreamLease>,
}

impl RelayStream {
    pub fn new<S, E>(inner: S, mut lease: UpstreamLease) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        lease.mark_streaming();
        Self {
            inner: Some(inner.map_err(Into::<BoxError>::into).boxed()),
            lease: Some(lease),
        }
    }

    fn finish(&mut self, reason: ReleaseReason) {
        self.inner = None;
        if let Some(lease) = self.lease.take() {
            lease.release(reason);
        }
    }
}

impl Stream for RelayStream {
    type Item = Result<Bytes, BoxError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(None);
        };

        match inner.poll_next_unpin(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(Ok(chunk))) => {
                if let Some(lease) = this.lease.as_mut() {
                    lease.record_chunk(chunk.len());
                }
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                if let Some(lease) = this.lease.as_ref() {
                    tracing::warn!(
                        request_id = %lease.request_id(),
                        error = %e,
                        "Upstream stream failed mid-body"
                    );
                }
                this.finish(ReleaseReason::Failed);
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.finish(ReleaseReason::Completed);
                Poll::Ready(None)
            }
        }
    }
}
