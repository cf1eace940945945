use std::fmt::Debug;
use std::hash::Hash;

/// Bound shared by every node identifier the graph (and the tracklet algorithms) accept.
///
/// Integers, strings and tuples of those all qualify. `Ord` is required because tracklet
/// extraction iterates nodes in sorted order.
pub trait NodeId: Clone + Eq + Hash + Ord + Debug {}

impl<T> NodeId for T where T: Clone + Eq + Hash + Ord + Debug {}
