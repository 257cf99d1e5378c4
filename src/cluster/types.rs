use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A single member of the cluster, as seen from the local node.
///
/// Identity and reachability are deliberately conflated: `id` is the
/// `host:port` the peer listens on, and `addr` always equals `id`. The two
/// fields are kept separate on the wire so they could diverge later without a
/// protocol change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Peer {
    /// Unique ID of the peer (`host:port`).
    pub id: String,
    /// Reachable HTTP address of the peer.
    pub addr: String,

    /// Local timestamp of when this peer was last heard from.
    /// Not serialized over the network; used only by the local expiry sweep.
    #[serde(skip)]
    pub last_seen: Option<Instant>,
}

impl Peer {
    /// Builds a peer entry that was observed just now.
    pub fn seen_now(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            addr: id.clone(),
            id,
            last_seen: Some(Instant::now()),
        }
    }
}
