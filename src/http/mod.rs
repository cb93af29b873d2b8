//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (attach request ID)
//!     → extract.rs (JSON body, content type optional)
//!     → completions.rs (auth check, hand off to relay)
//!     → response.rs (mirror upstream or build local error)
//!     → Send to client
//! ```

pub mod completions;
pub mod extract;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestId, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
