use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::client::Transport;
use crate::cluster::registry::Registry;

use super::protocol::ENDPOINT_COUNTER_PROPAGATE;
use super::types::Increment;

const PROPAGATION_INITIAL_DELAY: Duration = Duration::from_millis(500);
const PROPAGATION_MAX_DELAY: Duration = Duration::from_secs(2);
const PROPAGATION_MAX_ELAPSED: Duration = Duration::from_secs(10);

/// Counter value plus the increment ids that produced it. Both fields sit
/// under one lock so `value == seen.len()` holds at every observable instant.
#[derive(Default)]
struct CounterState {
    value: u64,
    seen: HashSet<String>,
}

/// The node's replicated, in-memory counter.
pub struct Counter {
    self_id: String,
    state: RwLock<CounterState>,
    registry: Arc<Registry>,
    client: Arc<dyn Transport>,
}

impl Counter {
    pub fn new(
        self_id: impl Into<String>,
        registry: Arc<Registry>,
        client: Arc<dyn Transport>,
    ) -> Arc<Self> {
        Arc::new(Self {
            self_id: self_id.into(),
            state: RwLock::new(CounterState::default()),
            registry,
            client,
        })
    }

    /// Mints a fresh increment, applies it locally, and fans it out to the
    /// peers known at this moment. Returns once the local apply is done;
    /// propagation continues in background tasks.
    pub async fn local_increment(&self) {
        let increment = Increment {
            id: Uuid::new_v4().to_string(),
            node_id: self.self_id.clone(),
        };

        self.apply(increment.clone()).await;

        // Snapshot taken after the lock is released; peers that join later
        // never receive this increment.
        for peer_addr in self.registry.peer_addrs().await {
            let client = self.client.clone();
            let inc = increment.clone();
            tokio::spawn(async move {
                propagate(client, peer_addr, inc).await;
            });
        }
    }

    /// Applies an increment unless its id was already seen. The check and the
    /// insert happen under one write guard, so concurrent duplicates cannot
    /// both get through. Returns whether the increment was applied.
    pub async fn apply(&self, inc: Increment) -> bool {
        let mut state = self.state.write().await;
        if state.seen.contains(&inc.id) {
            debug!("Ignoring duplicate increment {}", inc.id);
            return false;
        }

        state.value += 1;
        state.seen.insert(inc.id.clone());
        debug!(
            "Applied increment {} from node {}. New value: {}",
            inc.id, inc.node_id, state.value
        );
        true
    }

    /// Snapshot read of the current value.
    pub async fn value(&self) -> u64 {
        self.state.read().await.value
    }
}

/// Pushes one increment to one peer, retrying with exponential backoff and
/// jitter until the elapsed budget runs out. On ultimate failure the increment
/// is dropped for that peer; there is no dead-letter queue.
async fn propagate(client: Arc<dyn Transport>, peer_addr: String, inc: Increment) {
    let url = format!("http://{}{}", peer_addr, ENDPOINT_COUNTER_PROPAGATE);
    let body: Value = match serde_json::to_value(&inc) {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to serialize increment {}: {}", inc.id, e);
            return;
        }
    };

    let started = Instant::now();
    let mut delay = PROPAGATION_INITIAL_DELAY;

    loop {
        match client.post_json(&url, &body).await {
            Ok(_) => return,
            Err(e) => {
                warn!(
                    "Failed to propagate increment {} to {}. Retrying... Error: {}",
                    inc.id, peer_addr, e
                );
            }
        }

        if started.elapsed() >= PROPAGATION_MAX_ELAPSED {
            error!(
                "Permanently failed to propagate increment {} to {} within {:?}",
                inc.id, peer_addr, PROPAGATION_MAX_ELAPSED
            );
            return;
        }

        let jitter = Duration::from_millis(rand::random::<u64>() % 250);
        tokio::time::sleep(delay + jitter).await;
        delay = (delay + delay / 2).min(PROPAGATION_MAX_DELAY);
    }
}
