//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to an external service:
//!     → per-attempt timeout (tokio::time::timeout at the call site)
//!     → on transport failure: retry with jittered backoff (backoff.rs)
//! ```
//!
//! # Design Decisions
//! - Retries only for idempotent requests (GET, HEAD)
//! - Jittered backoff prevents thundering herd
//! - Both timeout and retry policy come from RetryConfig, never hardcoded

pub mod backoff;

pub use backoff::delay_for_attempt;
