//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the relay produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log event of a request
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
