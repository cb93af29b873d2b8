//! Relay error definitions.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failures that happen before any byte has been sent to the client.
///
/// Every variant is converted to a `500` with a plain-text body; failures
/// after streaming has begun never reach this type.
#[derive(Debug, Error)]
pub enum RelayError {
    /// DNS, TCP, TLS or protocol failure while sending the request.
    #[error("Error connecting to upstream API: {}", error_chain(.0))]
    Connect(#[source] reqwest::Error),

    /// No upstream response within the configured budget.
    #[error("Error connecting to upstream API: no response within {0} seconds")]
    Timeout(u64),

    /// Upstream connection broke while reading a buffered body.
    #[error("Error connecting to upstream API: {}", error_chain(.0))]
    Body(#[source] reqwest::Error),

    /// Payload could not be encoded.
    #[error("Failed to encode upstream payload: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type RelayResult<T> = Result<T, RelayError>;

/// Render an error with its sources, e.g. "error sending request: connection refused".
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
