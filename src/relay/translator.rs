//! Request translation: client request → upstream payload and headers.
//!
//! # Responsibilities
//! - Copy messages in order, `role` and `content` only
//! - Drop every optional field that is absent
//! - Build the outbound header set around the forwarded credential
//!
//! # Design Decisions
//! - Pure and infallible; encoding to bytes happens at the call site
//! - The credential is forwarded as the raw header value, never re-parsed

use axum::http::{header, HeaderMap, HeaderValue};
use serde::Serialize;

use crate::relay::types::{ChatCompletionRequest, ChatMessage, StopSequence};

/// JSON body sent upstream. Absent fields are omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamPayload<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<&'a StopSequence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i64>,
}

impl<'a> From<&'a ChatCompletionRequest> for UpstreamPayload<'a> {
    fn from(req: &'a ChatCompletionRequest) -> Self {
        Self {
            model: &req.model,
            messages: &req.messages,
            temperature: req.temperature,
            top_p: req.top_p,
            n: req.n,
            stream: req.stream,
            stop: req.stop.as_ref(),
            max_tokens: req.max_tokens,
        }
    }
}

/// Headers for the upstream call: the forwarded credential and JSON content type.
pub fn outbound_headers(credential: &HeaderValue) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(2);
    headers.insert(header::AUTHORIZATION, credential.clone());
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}
