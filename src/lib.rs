//! OpenAI-compatible chat-completion relay library.
//!
//! Accepts `POST /v1/chat/completions`, forwards the request to a single
//! upstream API, and mirrors the upstream response back either buffered or
//! as a live stream.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
