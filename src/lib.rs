//! Land-brokerage admin gateway.
//!
//! Two loosely related subsystems behind one crate:
//!
//! - `proxy` — a stateless forwarder in front of a single fixed backend
//!   origin: header scrubbing, JSON body normalization, content-type
//!   dispatch on responses, permissive CORS on everything.
//! - `selection` — the dashboard's cascading location-filter state machine
//!   (State → District → Mandal → Village), multi-select tag fields with
//!   orphan cleanup, deposit derivation, and submission payload assembly.

pub mod config;
pub mod observability;
pub mod proxy;
pub mod resilience;
pub mod selection;

pub use config::GatewayConfig;
pub use proxy::ProxyServer;
pub use selection::SelectionSession;
