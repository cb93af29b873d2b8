//! Chat-completion relay subsystem.
//!
//! # Data Flow
//! ```text
//! ChatCompletionRequest (validated by the Json extractor)
//!     → translator.rs (payload without absent fields + outbound headers)
//!     → upstream.rs (single POST, deadline enforced)
//!         → buffered: full body, mirrored as one response
//!         → streaming: stream.rs relays chunks as they arrive
//!     → client
//! ```
//!
//! # Design Decisions
//! - No retries, no caching, no cross-request state
//! - Errors before the first byte become `500`; errors after it abort the body
//! - Streamed exchanges are bound to an `UpstreamLease` released exactly once

pub mod error;
pub mod stream;
pub mod translator;
pub mod types;
pub mod upstream;

pub use error::{RelayError, RelayResult};
pub use stream::{RelayStream, ReleaseReason, UpstreamLease};
pub use translator::{outbound_headers, UpstreamPayload};
pub use types::{ChatCompletionRequest, ChatMessage, StopSequence};
pub use upstream::UpstreamClient;
