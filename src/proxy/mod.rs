//! Reverse proxy subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (Axum setup, request ID, OPTIONS short-circuit)
//!     → forward.rs (URI rewrite, header scrub, body normalization,
//!       timeout/retry, content-type dispatch on the response)
//!     → cors.rs (permissive headers on every response)
//!     → error.rs (all failures collapse to one 500 JSON shape)
//! ```

pub mod cors;
pub mod error;
pub mod forward;
pub mod server;

pub use error::ProxyError;
pub use forward::Forwarder;
pub use server::ProxyServer;
