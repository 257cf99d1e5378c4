use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::client::Transport;

use super::protocol::{ENDPOINT_CLUSTER_HEARTBEAT, ENDPOINT_CLUSTER_JOIN};
use super::types::Peer;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);
const PEER_EXPIRY: Duration = Duration::from_secs(15);

/// Timing knobs for the membership loop. The defaults give a peer fifteen
/// missed heartbeats before it is declared gone.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub heartbeat_interval: Duration,
    pub peer_expiry: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: HEARTBEAT_INTERVAL,
            peer_expiry: PEER_EXPIRY,
        }
    }
}

/// Manages the list of peers in the cluster.
///
/// All peer state lives behind a single reader/writer lock; the lock is never
/// held across an outbound call.
pub struct Registry {
    self_id: String,
    peers: RwLock<HashMap<String, Peer>>,
    client: Arc<dyn Transport>,
    config: RegistryConfig,
}

impl Registry {
    pub fn new(self_id: impl Into<String>, client: Arc<dyn Transport>) -> Arc<Self> {
        Self::with_config(self_id, client, RegistryConfig::default())
    }

    pub fn with_config(
        self_id: impl Into<String>,
        client: Arc<dyn Transport>,
        config: RegistryConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            self_id: self_id.into(),
            peers: RwLock::new(HashMap::new()),
            client,
            config,
        })
    }

    pub fn self_id(&self) -> &str {
        &self.self_id
    }

    /// Begins the background tasks for announcing, heartbeating, and peer
    /// expiry. Returns once self is registered; the announce and the periodic
    /// tick continue until the process exits.
    pub async fn start(self: Arc<Self>, initial_peers: Vec<String>) {
        self.add_peer(Peer::seen_now(self.self_id.clone())).await;

        let announcer = self.clone();
        tokio::spawn(async move {
            announcer.announce(initial_peers).await;
        });

        let ticker = self.clone();
        tokio::spawn(async move {
            ticker.tick_loop().await;
        });
    }

    /// Snapshot of all known peer addresses, excluding self.
    pub async fn peer_addrs(&self) -> Vec<String> {
        let peers = self.peers.read().await;
        peers
            .values()
            .filter(|peer| peer.id != self.self_id)
            .map(|peer| peer.addr.clone())
            .collect()
    }

    /// Snapshot of every known peer, including self.
    pub async fn peers(&self) -> Vec<Peer> {
        let peers = self.peers.read().await;
        peers.values().cloned().collect()
    }

    /// Records the joining node and returns the full current peer list
    /// (including self and the joiner) in one atomic step.
    pub async fn handle_join(&self, peer_id: &str) -> Vec<Peer> {
        let mut peers = self.peers.write().await;
        info!("Node {} is joining the cluster", peer_id);
        peers.insert(peer_id.to_string(), Peer::seen_now(peer_id));
        peers.values().cloned().collect()
    }

    /// Refreshes the last seen time for a peer. A heartbeat from an unknown
    /// peer inserts it, so discovery self-heals.
    pub async fn handle_heartbeat(&self, peer_id: &str) {
        let mut peers = self.peers.write().await;
        match peers.get_mut(peer_id) {
            Some(peer) => {
                peer.last_seen = Some(Instant::now());
            }
            None => {
                info!(
                    "Received heartbeat from unknown peer {}, adding to list",
                    peer_id
                );
                peers.insert(peer_id.to_string(), Peer::seen_now(peer_id));
            }
        }
    }

    pub async fn add_peer(&self, peer: Peer) {
        let mut peers = self.peers.write().await;
        peers.insert(peer.id.clone(), peer);
    }

    /// Merges peers learned from an announce response. Known ids keep their
    /// existing `last_seen`; new ones are stamped as seen now.
    pub async fn sync_peers(&self, new_peers: Vec<Peer>) {
        let mut peers = self.peers.write().await;
        for peer in new_peers {
            if !peers.contains_key(&peer.id) {
                info!("Discovered new peer {} from sync", peer.id);
                peers.insert(
                    peer.id.clone(),
                    Peer {
                        last_seen: Some(Instant::now()),
                        ..peer
                    },
                );
            }
        }
    }

    /// Removes every non-self peer whose `last_seen` is older than the expiry
    /// window at the moment of the sweep.
    pub async fn remove_expired_peers(&self) {
        let mut peers = self.peers.write().await;
        let now = Instant::now();
        let expiry = self.config.peer_expiry;
        peers.retain(|id, peer| {
            if *id == self.self_id {
                return true;
            }
            match peer.last_seen {
                Some(last_seen) => {
                    if now.duration_since(last_seen) > expiry {
                        info!("Peer {} expired, removing from list", id);
                        false
                    } else {
                        true
                    }
                }
                None => {
                    peer.last_seen = Some(now);
                    true
                }
            }
        });
    }

    async fn announce(self: Arc<Self>, initial_peers: Vec<String>) {
        for peer_addr in initial_peers {
            if peer_addr == self.self_id {
                continue;
            }

            let url = format!("http://{}{}", peer_addr, ENDPOINT_CLUSTER_JOIN);
            let body = json!({ "id": self.self_id });

            info!("Announcing self to peer {}", peer_addr);
            let response = match self.client.post_json(&url, &body).await {
                Ok(response) => response,
                Err(e) => {
                    warn!("Failed to announce to peer {}: {}", peer_addr, e);
                    continue;
                }
            };

            match serde_json::from_value::<Vec<Peer>>(response) {
                Ok(response_peers) => {
                    info!(
                        "Successfully announced to {}, received {} peers",
                        peer_addr,
                        response_peers.len()
                    );
                    self.sync_peers(response_peers).await;
                }
                Err(e) => {
                    warn!("Malformed announce response from {}: {}", peer_addr, e);
                }
            }
        }
    }

    async fn tick_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.config.heartbeat_interval);

        loop {
            interval.tick().await;
            self.send_heartbeats().await;
            self.remove_expired_peers().await;
        }
    }

    /// Fans a heartbeat out to every known peer. Each send runs in its own
    /// task; failures are logged and left for the expiry sweep to judge.
    async fn send_heartbeats(&self) {
        for peer_addr in self.peer_addrs().await {
            let client = self.client.clone();
            let self_id = self.self_id.clone();
            tokio::spawn(async move {
                let url = format!("http://{}{}", peer_addr, ENDPOINT_CLUSTER_HEARTBEAT);
                let body = json!({ "id": self_id });
                match client.post_json(&url, &body).await {
                    Ok(_) => debug!("Sent heartbeat to {}", peer_addr),
                    Err(e) => warn!("Failed to send heartbeat to {}: {}", peer_addr, e),
                }
            });
        }
    }
}
