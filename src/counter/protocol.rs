//! Counter Network Protocol
//!
//! Endpoints and DTOs for the counter surface. The propagate body is the
//! [`Increment`](super::types::Increment) itself.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Public endpoint: generate one increment and fan it out to the cluster.
pub const ENDPOINT_INCREMENT: &str = "/increment";
/// Public endpoint: read the current counter value.
pub const ENDPOINT_COUNT: &str = "/count";
/// Internal endpoint: apply an increment originated on another node.
pub const ENDPOINT_COUNTER_PROPAGATE: &str = "/counter/propagate";

// --- Data Transfer Objects ---

/// Response for the public count read.
#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}
