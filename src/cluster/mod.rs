//! Cluster Membership Module
//!
//! Tracks the set of known peers and their freshness. Each node announces
//! itself to its initial peers on startup, sends an HTTP heartbeat to every
//! known peer once per second, and evicts peers that have not been heard from
//! within the expiry window.
//!
//! ## Core Mechanisms
//! - **Announce**: a one-shot `join` message to each initial peer; the
//!   response carries the responder's full peer list, which is merged locally.
//! - **Heartbeat**: periodic liveness proof. Receiving a heartbeat from an
//!   unknown peer inserts it, so a node that missed the announce still
//!   converges onto the membership.
//! - **Expiry**: a sweep on every tick removes peers whose `last_seen` is
//!   older than the expiry window. The local node itself is never evicted.

pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod types;
