//! Cascading selection engine subsystem.
//!
//! # Data Flow
//! ```text
//! form opens
//!     → cascade.rs begin() emits FetchCommand for the top level
//!     → driver.rs runs it through client.rs (bearer token from session.rs)
//!     → apply_options populates the level (generation guard drops stale
//!       responses after a parent change)
//! user picks a value
//!     → cascade.rs select() clears deeper levels, emits the child fetch
//! independent tag fields and preference maps
//!     → tags.rs (orphan cleanup on every mandal-level mutation)
//! land selection
//!     → deposit.rs (0.5% of total worth, recomputed on every toggle)
//! submit
//!     → payload.rs builds the AgentSubmission body
//! ```

pub mod cascade;
pub mod client;
pub mod deposit;
pub mod driver;
pub mod payload;
pub mod session;
pub mod tags;
pub mod types;

pub use cascade::{CascadeState, FetchCommand, LevelState};
pub use client::LocationClient;
pub use deposit::{LandBasket, LandItem, DEPOSIT_RATE};
pub use driver::SelectionSession;
pub use payload::{build_agent_submission, AgentSubmission, PayloadError};
pub use session::Session;
pub use tags::{PreferenceTree, TagField};
pub use types::{Level, LocationOption, SelectionError, SelectionResult};
