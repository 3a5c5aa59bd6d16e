//! Selection engine types and error definitions.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// One level of the geographic hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    State,
    District,
    Mandal,
    Village,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::State => "state",
            Level::District => "district",
            Level::Mandal => "mandal",
            Level::Village => "village",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable option at a hierarchy level.
///
/// The backend keys child fetches by `id` but the dashboard's forms select
/// and submit by `name`; both are kept. Some endpoints serve numeric ids and
/// others strings, so the id is normalized to a string on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationOption {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    pub name: String,
}

impl LocationOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

fn id_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Str(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Num(n) => n.to_string(),
        Raw::Str(s) => s,
    })
}

/// Errors that can occur in the selection engine.
#[derive(Debug, Clone, Error)]
pub enum SelectionError {
    /// Network or connection failure talking to the location API.
    #[error("transport error: {0}")]
    Transport(String),

    /// Location API call exceeded the configured deadline.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Location API answered with a non-success status.
    #[error("upstream returned {code}: {message}")]
    Status { code: u16, message: String },

    /// Response body was not the expected option list.
    #[error("decode error: {0}")]
    Decode(String),

    /// Client configuration (base URL, TLS setup) was unusable.
    #[error("invalid location API config: {0}")]
    Config(String),

    /// A child-level fetch was requested without a resolved parent id.
    #[error("cannot fetch {0} options without a parent id")]
    MissingParent(Level),

    /// Hierarchy index outside the configured levels.
    #[error("no hierarchy level at index {0}")]
    UnknownLevel(usize),

    /// Selection attempted while the level had no loaded options.
    #[error("{level} options are not loaded yet")]
    LevelNotReady { level: Level },

    /// Hierarchy definition was empty or out of order.
    #[error("invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    /// Tag mutation referenced a parent that is not selected.
    #[error("{field}: parent '{parent}' is not selected")]
    UnknownParent { field: &'static str, parent: String },
}

/// Result type for selection engine operations.
pub type SelectionResult<T> = Result<T, SelectionError>;
