//! Replicated Counter Module
//!
//! Holds the node's share of the replicated counter: a non-negative integer
//! plus the set of increment ids already applied. Every locally generated
//! increment is applied first, then pushed to all currently known peers with
//! exponential-backoff retry. Because increments carry globally unique ids and
//! application deduplicates on those ids, duplicate delivery is harmless and
//! all live nodes converge to the same value.

pub mod handlers;
pub mod protocol;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;
