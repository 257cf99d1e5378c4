//! Replicated In-Memory Counter Cluster Library
//!
//! This library crate defines the core modules that make up a counter node.
//! It serves as the foundation for the binary executable (`main.rs`) and for
//! the integration tests, which assemble nodes the same way the binary does.
//!
//! ## Architecture Modules
//! The system is composed of four loosely coupled subsystems:
//!
//! - **`cluster`**: The membership layer. Each node announces itself to its
//!   initial peers, exchanges periodic HTTP heartbeats, and evicts peers that
//!   have gone silent for too long.
//! - **`counter`**: The replicated state layer. Holds a monotonically
//!   increasing in-memory counter and propagates every locally generated
//!   increment to all known peers with retry; deduplication by increment id
//!   makes delivery idempotent.
//! - **`client`**: The outbound HTTP client used for all inter-node calls,
//!   behind a small trait so the core logic can be exercised against a mock.
//! - **`transport`**: The inbound HTTP surface. Wires the cluster and counter
//!   handlers into an Axum router and exposes the health endpoints.

pub mod client;
pub mod cluster;
pub mod counter;
pub mod transport;
