//! Writing extracted tracklet ids onto a lineage graph.

use crate::extract::Tracklets;
use crate::label::{NodeAttrs, TrackletLabel};
use lineage_graphlib::{Graph, GraphOptions, NodeId};

impl<K> Tracklets<K>
where
    K: NodeId,
{
    /// Sets `key` on every node of `g` that this extraction assigned. Nodes unknown to the
    /// extraction are left untouched. Returns the number of annotated nodes.
    pub fn annotate<N>(&self, g: &mut Graph<K, N>, key: &str) -> usize
    where
        N: TrackletLabel + Default,
    {
        let mut annotated = 0;
        for (node, &tid) in self.node_to_tracklet() {
            if let Some(label) = g.node_mut(node) {
                label.set_tracklet_id(key, tid);
                annotated += 1;
            }
        }
        annotated
    }
}

/// Builds a lineage graph from `edges` (nodes in first-seen order, duplicate edges collapsed)
/// with every node annotated under `key`.
///
/// Self-loops are left out, matching what extraction does with them under
/// [`SelfLoopPolicy::Ignore`](crate::SelfLoopPolicy::Ignore). The node itself is kept.
pub fn lineage_graph<K>(edges: &[(K, K)], tracklets: &Tracklets<K>, key: &str) -> Graph<K, NodeAttrs>
where
    K: NodeId,
{
    let mut g: Graph<K, NodeAttrs> = Graph::new(GraphOptions::default());
    for (u, v) in edges {
        if u == v {
            g.set_node(u.clone(), NodeAttrs::new());
        } else {
            g.set_edge(u.clone(), v.clone());
        }
    }
    let annotated = tracklets.annotate(&mut g, key);
    tracing::debug!(
        nodes = g.node_count(),
        edges = g.edge_count(),
        annotated,
        key,
        "annotated lineage graph"
    );
    g
}
