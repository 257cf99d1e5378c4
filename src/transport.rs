//! HTTP Transport Adapter
//!
//! Assembles the Axum router that exposes the cluster and counter operations,
//! plus the operator-facing health endpoints. The binary and the integration
//! tests both build nodes through [`build_router`], so they always serve the
//! same surface.

use axum::extract::Extension;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use sysinfo::System;

use crate::cluster::handlers::{handle_heartbeat, handle_join};
use crate::cluster::protocol::{ENDPOINT_CLUSTER_HEARTBEAT, ENDPOINT_CLUSTER_JOIN};
use crate::cluster::registry::Registry;
use crate::counter::handlers::{handle_count, handle_increment, handle_propagate};
use crate::counter::protocol::{ENDPOINT_COUNT, ENDPOINT_COUNTER_PROPAGATE, ENDPOINT_INCREMENT};
use crate::counter::service::Counter;

pub fn build_router(registry: Arc<Registry>, counter: Arc<Counter>) -> Router {
    Router::new()
        .route("/health/routes", get(handle_routes))
        .route("/health/stats", get(handle_stats))
        // Public API
        .route(ENDPOINT_INCREMENT, post(handle_increment))
        .route(ENDPOINT_COUNT, get(handle_count))
        // Internal cluster API
        .route(ENDPOINT_CLUSTER_JOIN, post(handle_join))
        .route(ENDPOINT_CLUSTER_HEARTBEAT, post(handle_heartbeat))
        // Internal counter API
        .route(ENDPOINT_COUNTER_PROPAGATE, post(handle_propagate))
        .layer(Extension(registry))
        .layer(Extension(counter))
}

#[derive(Serialize)]
struct RoutesResponse {
    routes: Vec<&'static str>,
}

#[derive(Serialize, Clone)]
struct PeerInfo {
    id: String,
    addr: String,
}

#[derive(Serialize)]
struct NodeStatsResponse {
    node_id: String,
    count: u64,
    known_peers: usize,
    peers: Vec<PeerInfo>,
    cpu_usage: f32,
    mem_used_mb: u64,
    mem_total_mb: u64,
}

async fn handle_routes() -> Json<RoutesResponse> {
    Json(RoutesResponse {
        routes: vec![
            "/health/routes",
            "/health/stats",
            "/increment",
            "/count",
            "/cluster/join",
            "/cluster/heartbeat",
            "/counter/propagate",
        ],
    })
}

async fn handle_stats(
    Extension(registry): Extension<Arc<Registry>>,
    Extension(counter): Extension<Arc<Counter>>,
) -> Json<NodeStatsResponse> {
    let peers: Vec<PeerInfo> = registry
        .peers()
        .await
        .into_iter()
        .map(|p| PeerInfo {
            id: p.id,
            addr: p.addr,
        })
        .collect();

    let mut sys = System::new_all();
    sys.refresh_cpu();
    sys.refresh_memory();
    let cpu_usage = sys.global_cpu_info().cpu_usage();
    // sysinfo returns bytes for memory values.
    let mem_total_mb = sys.total_memory() / (1024 * 1024);
    let mem_used_mb = sys.used_memory() / (1024 * 1024);

    Json(NodeStatsResponse {
        node_id: registry.self_id().to_string(),
        count: counter.value().await,
        known_peers: peers.len(),
        peers,
        cpu_usage,
        mem_used_mb,
        mem_total_mb,
    })
}
