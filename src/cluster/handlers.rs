//! Cluster API Handlers
//!
//! HTTP endpoints that expose the [`Registry`] to the network. These handlers
//! translate HTTP requests into membership calls; malformed bodies and blank
//! ids are rejected at this boundary so the registry itself never sees them.

use axum::Json;
use axum::extract::Extension;
use axum::http::StatusCode;
use std::sync::Arc;

use super::protocol::{HeartbeatRequest, JoinRequest};
use super::registry::Registry;
use super::types::Peer;

/// Announce endpoint. Records the joining peer and returns the full peer list.
pub async fn handle_join(
    Extension(registry): Extension<Arc<Registry>>,
    Json(req): Json<JoinRequest>,
) -> (StatusCode, Json<Vec<Peer>>) {
    if req.id.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, Json(Vec::new()));
    }

    let peer_list = registry.handle_join(&req.id).await;
    (StatusCode::OK, Json(peer_list))
}

/// Heartbeat endpoint. Refreshes (or inserts) the sender and returns no body.
pub async fn handle_heartbeat(
    Extension(registry): Extension<Arc<Registry>>,
    Json(req): Json<HeartbeatRequest>,
) -> StatusCode {
    if req.id.trim().is_empty() {
        return StatusCode::BAD_REQUEST;
    }

    registry.handle_heartbeat(&req.id).await;
    StatusCode::OK
}
