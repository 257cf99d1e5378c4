//! Cluster Network Protocol
//!
//! Endpoints and Data Transfer Objects for the membership exchange. Bodies are
//! JSON; the join response is a bare array of [`Peer`](super::types::Peer)
//! objects.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Endpoint a joining node announces itself to. Responds with the full peer list.
pub const ENDPOINT_CLUSTER_JOIN: &str = "/cluster/join";
/// Endpoint for the periodic liveness heartbeat. Empty response.
pub const ENDPOINT_CLUSTER_HEARTBEAT: &str = "/cluster/heartbeat";

// --- Data Transfer Objects ---

/// Body of an announce: the joining node's own id (`host:port`).
///
/// `id` defaults to empty on a missing field so the handler can reject blank
/// ids with a 400 instead of a deserialization error.
#[derive(Debug, Serialize, Deserialize)]
pub struct JoinRequest {
    #[serde(default)]
    pub id: String,
}

/// Body of a heartbeat: the sender's id. Same shape as [`JoinRequest`], kept
/// separate so the two messages can grow apart.
#[derive(Debug, Serialize, Deserialize)]
pub struct HeartbeatRequest {
    #[serde(default)]
    pub id: String,
}
