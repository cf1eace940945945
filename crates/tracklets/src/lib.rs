//! Tracklet extraction and lineage-tree ordering for object-tracking graphs.
//!
//! Two steps, usually run in sequence:
//!
//! 1. [`extract_tracklets`] splits a directed edge list into maximal linear segments and links
//!    them into a tracklet-level parent graph.
//! 2. [`order_tracklets`] reads tracklet ids off an annotated graph and returns the
//!    left-to-right order used to plot the lineage tree.
//!
//! Both are pure functions over in-memory data.

pub use lineage_graphlib as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Positive tracklet identifier. Extraction hands them out from 1 upward.
pub type TrackletId = u64;

mod annotate;
mod edges;
mod error;
mod extract;
mod label;
mod tree_order;

pub use annotate::lineage_graph;
pub use edges::EdgeList;
pub use error::{Error, Result};
pub use extract::{
    ExtractOptions, SelfLoopPolicy, Tracklets, extract_tracklets, extract_tracklets_with,
};
pub use label::{DEFAULT_TRACKLET_ID_KEY, NodeAttrs, TrackletLabel};
pub use tree_order::{
    OrderOptions, Placement, order_from_parents, order_parent_graph, order_tracklets,
    tracklet_parents,
};
