//! Tracklet extraction from a directed edge list.
//!
//! A tracklet is a maximal run of nodes in which every interior node has exactly one
//! predecessor and one successor. Divisions (several successors), merges (several
//! predecessors) and graph boundaries end a tracklet; the tracklets on either side of such a
//! point are linked in the returned parent graph.
//!
//! Ids start at 1 and follow discovery order, which is driven by the sorted node list. They
//! are unique and stable for a given edge list but carry no further meaning.

use crate::TrackletId;
use crate::error::{Error, Result};
use lineage_graphlib::NodeId;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

/// What to do with `(u, u)` edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelfLoopPolicy {
    /// Fail with [`Error::InvalidInput`].
    #[default]
    Reject,
    /// Drop the edge. The node still receives a tracklet.
    Ignore,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    pub self_loops: SelfLoopPolicy,
}

/// Result of one extraction: the node assignment plus the tracklet-level parent graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracklets<K> {
    node_to_tracklet: BTreeMap<K, TrackletId>,
    parents: BTreeMap<TrackletId, Vec<TrackletId>>,
    // `members[tid - 1]` lists the nodes of `tid` in path order.
    members: Vec<Vec<K>>,
}

impl<K> Tracklets<K>
where
    K: NodeId,
{
    pub fn node_to_tracklet(&self) -> &BTreeMap<K, TrackletId> {
        &self.node_to_tracklet
    }

    /// Child tracklet -> sorted, deduplicated parent tracklets. Roots have no entry.
    pub fn parent_graph(&self) -> &BTreeMap<TrackletId, Vec<TrackletId>> {
        &self.parents
    }

    pub fn into_parts(
        self,
    ) -> (
        BTreeMap<K, TrackletId>,
        BTreeMap<TrackletId, Vec<TrackletId>>,
    ) {
        (self.node_to_tracklet, self.parents)
    }

    pub fn tracklet_of(&self, node: &K) -> Option<TrackletId> {
        self.node_to_tracklet.get(node).copied()
    }

    pub fn parents_of(&self, tracklet: TrackletId) -> &[TrackletId] {
        self.parents.get(&tracklet).map_or(&[][..], Vec::as_slice)
    }

    pub fn tracklet_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn tracklet_ids(&self) -> std::ops::RangeInclusive<TrackletId> {
        1..=self.members.len() as TrackletId
    }

    /// Nodes of `tracklet`, from its first to its last time point.
    pub fn members(&self, tracklet: TrackletId) -> Option<&[K]> {
        let ix = usize::try_from(tracklet.checked_sub(1)?).ok()?;
        self.members.get(ix).map(Vec::as_slice)
    }

    pub fn roots(&self) -> Vec<TrackletId> {
        self.tracklet_ids()
            .filter(|tid| !self.parents.contains_key(tid))
            .collect()
    }

    pub fn children_of(&self, tracklet: TrackletId) -> Vec<TrackletId> {
        self.parents
            .iter()
            .filter(|(_, parents)| parents.contains(&tracklet))
            .map(|(&child, _)| child)
            .collect()
    }
}

pub fn extract_tracklets<K: NodeId>(edges: &[(K, K)]) -> Result<Tracklets<K>> {
    extract_tracklets_with(edges, &ExtractOptions::default())
}

pub fn extract_tracklets_with<K: NodeId>(
    edges: &[(K, K)],
    options: &ExtractOptions,
) -> Result<Tracklets<K>> {
    let mut walker = Walker::new(edges, options.self_loops)?;

    let mut nodes: Vec<&K> = edges.iter().flat_map(|(u, v)| [u, v]).collect();
    nodes.sort_unstable();
    nodes.dedup();

    let mut assigned: HashMap<&K, TrackletId> = HashMap::default();
    let mut members: Vec<Vec<K>> = Vec::new();

    for &node in &nodes {
        if walker.visited.contains(node) {
            continue;
        }
        let start = walker.find_start(node);
        let path = walker.walk_forward(start);

        let tid = members.len() as TrackletId + 1;
        tracing::trace!(tracklet = tid, len = path.len(), start = ?start, "tracklet");
        for &n in &path {
            assigned.insert(n, tid);
        }
        members.push(path.into_iter().cloned().collect());
    }

    let mut parents: BTreeMap<TrackletId, Vec<TrackletId>> = BTreeMap::new();
    for (child, parent_nodes) in &walker.node_parents {
        let Some(&child_tid) = assigned.get(*child) else {
            continue;
        };
        for parent in parent_nodes {
            if let Some(&parent_tid) = assigned.get(*parent) {
                parents.entry(child_tid).or_default().push(parent_tid);
            }
        }
    }
    for list in parents.values_mut() {
        list.sort_unstable();
        list.dedup();
    }

    let node_to_tracklet: BTreeMap<K, TrackletId> = assigned
        .into_iter()
        .map(|(node, tid)| (node.clone(), tid))
        .collect();

    tracing::debug!(
        edges = edges.len(),
        nodes = nodes.len(),
        tracklets = members.len(),
        linked = parents.len(),
        "extracted tracklets"
    );

    Ok(Tracklets {
        node_to_tracklet,
        parents,
        members,
    })
}

fn neighbors<'m, 'a, K: NodeId>(map: &'m HashMap<&'a K, Vec<&'a K>>, node: &K) -> &'m [&'a K] {
    map.get(node).map_or(&[][..], Vec::as_slice)
}

/// Traversal state for a single extraction call.
struct Walker<'a, K> {
    successors: HashMap<&'a K, Vec<&'a K>>,
    predecessors: HashMap<&'a K, Vec<&'a K>>,
    visited: HashSet<&'a K>,
    // child node -> nodes that end a tracklet right before it
    node_parents: HashMap<&'a K, Vec<&'a K>>,
}

impl<'a, K: NodeId> Walker<'a, K> {
    fn new(edges: &'a [(K, K)], self_loops: SelfLoopPolicy) -> Result<Self> {
        let mut successors: HashMap<&'a K, Vec<&'a K>> = HashMap::default();
        let mut predecessors: HashMap<&'a K, Vec<&'a K>> = HashMap::default();

        for (u, v) in edges {
            if u == v {
                match self_loops {
                    SelfLoopPolicy::Reject => {
                        return Err(Error::invalid_input(format!("self-loop on node {u:?}")));
                    }
                    SelfLoopPolicy::Ignore => continue,
                }
            }
            successors.entry(u).or_default().push(v);
            predecessors.entry(v).or_default().push(u);
        }

        Ok(Self {
            successors,
            predecessors,
            visited: HashSet::default(),
            node_parents: HashMap::default(),
        })
    }

    /// Walks back while the chain is unambiguous: exactly one predecessor that has not been
    /// assigned yet. A cycle of such nodes stops where it closes.
    fn find_start(&self, node: &'a K) -> &'a K {
        let mut start = node;
        let mut seen: HashSet<&'a K> = HashSet::default();
        seen.insert(node);
        while let &[pred] = neighbors(&self.predecessors, start) {
            if self.visited.contains(pred) || !seen.insert(pred) {
                break;
            }
            start = pred;
        }
        start
    }

    fn walk_forward(&mut self, start: &'a K) -> Vec<&'a K> {
        let mut path = Vec::new();
        let mut current = start;
        loop {
            path.push(current);
            self.visited.insert(current);

            let successors = neighbors(&self.successors, current);
            let &[next] = successors else {
                // division or leaf
                for &child in successors {
                    self.node_parents.entry(child).or_default().push(current);
                }
                break;
            };
            if neighbors(&self.predecessors, next).len() != 1 {
                // merge; `next` starts its own tracklet
                self.node_parents.entry(next).or_default().push(current);
                break;
            }
            if self.visited.contains(next) {
                break;
            }
            current = next;
        }
        path
    }
}
