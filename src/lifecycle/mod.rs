//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → server stops accepting → in-flight requests drain → exit
//! ```
//!
//! # Design Decisions
//! - One broadcast coordinator; OS signals are just one producer
//! - Tests trigger shutdown directly without touching process signals

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
