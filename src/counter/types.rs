use serde::{Deserialize, Serialize};

/// A single unit of counter mutation.
///
/// `id` is a UUID minted once at the originating node; two increments with the
/// same id are the same event no matter how often they are delivered.
/// `node_id` names the originator and is informational only.
///
/// Both fields default to empty on missing JSON keys so the transport boundary
/// can reject blank ids with a 400 instead of a deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Increment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub node_id: String,
}
