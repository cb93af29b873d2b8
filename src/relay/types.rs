//! Chat-completion request types accepted from clients.

use serde::{Deserialize, Serialize};

/// A single chat message. Only `role` and `content` are kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// `stop` accepts a single sequence or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StopSequence {
    Single(String),
    Many(Vec<String>),
}

/// Inbound `POST /v1/chat/completions` body.
///
/// A field left out of the JSON takes its default; a field sent as `null`
/// is absent and will not be forwarded. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default = "default_temperature")]
    pub temperature: Option<f64>,
    #[serde(default = "default_top_p")]
    pub top_p: Option<f64>,
    #[serde(default = "default_n")]
    pub n: Option<i64>,
    #[serde(default = "default_stream")]
    pub stream: Option<bool>,
    #[serde(default)]
    pub stop: Option<StopSequence>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: Option<i64>,
}

fn default_temperature() -> Option<f64> {
    Some(1.0)
}

fn default_top_p() -> Option<f64> {
    Some(1.0)
}

fn default_n() -> Option<i64> {
    Some(1)
}

fn default_stream() -> Option<bool> {
    Some(false)
}

fn default_max_tokens() -> Option<i64> {
    Some(32768)
}

impl ChatCompletionRequest {
    /// Whether the client asked for a streamed response.
    pub fn is_streaming(&self) -> bool {
        self.stream.unwrap_or(false)
    }
}
