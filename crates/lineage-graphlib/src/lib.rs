//! Graph container APIs used by `tracklets`.
//!
//! The container keeps nodes in insertion order and records directed edges with per-node
//! predecessor lists, so predecessor queries are cheap and deterministic.

mod graph;

pub use graph::{Graph, GraphOptions, NodeId};
