//! Submission payload assembly.
//!
//! The agent form's terminal state is serialized into one JSON body. Maps
//! are emitted in insertion order; the backend does not care, the dashboard
//! rendering does.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::selection::deposit::LandBasket;
use crate::selection::session::Session;
use crate::selection::tags::PreferenceTree;

/// Validation failures caught before submission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("missing required field: {0}")]
    Missing(&'static str),
}

/// Agent onboarding submission body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSubmission {
    pub user_id: String,
    pub deposit: f64,
    pub preferred_districts: Vec<String>,
    #[serde(serialize_with = "serialize_pairs")]
    pub preferred_mandals: Vec<(String, Vec<String>)>,
    #[serde(serialize_with = "serialize_pairs")]
    pub preferred_villages: Vec<(String, Vec<String>)>,
    pub attach_lands: Vec<String>,
}

/// Build the submission from the form's terminal state.
///
/// Blocks on client-side validation failures instead of letting the backend
/// reject them: the session must carry a user and at least one preferred
/// district must be chosen.
pub fn build_agent_submission(
    session: &Session,
    preferences: &PreferenceTree,
    basket: &LandBasket,
) -> Result<AgentSubmission, PayloadError> {
    if session.user_id().is_empty() {
        return Err(PayloadError::Missing("user_id"));
    }
    if preferences.districts().is_empty() {
        return Err(PayloadError::Missing("preferred_districts"));
    }

    Ok(AgentSubmission {
        user_id: session.user_id().to_string(),
        deposit: basket.deposit(),
        preferred_districts: preferences.districts().to_vec(),
        preferred_mandals: preferences.mandals().to_vec(),
        preferred_villages: preferences.villages().to_vec(),
        attach_lands: basket.selected().to_vec(),
    })
}

/// Serialize an ordered `(key, values)` list as a JSON object.
fn serialize_pairs<S>(pairs: &[(String, Vec<String>)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (key, values) in pairs {
        map.serialize_entry(key, values)?;
    }
    map.end()
}
