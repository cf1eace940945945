//! Left-to-right ordering of tracklets for lineage-tree plots.
//!
//! Every tracklet gets exactly one slot. With [`Placement::ParentFirst`] a tracklet is followed
//! directly by the subtrees of its children, so a lineage reads as one contiguous block and a
//! naive plot draws it without crossings.
//!
//! The parent of a tracklet is read through a single predecessor: the first predecessor (other
//! than the node itself) of the first node in graph order carrying that tracklet id. Merges are
//! therefore not disambiguated; each tracklet is laid out under one parent only. Use
//! [`order_parent_graph`] to order straight from an extraction result instead.

use crate::TrackletId;
use crate::error::{Error, Result};
use crate::extract::Tracklets;
use crate::label::{DEFAULT_TRACKLET_ID_KEY, TrackletLabel};
use indexmap::IndexMap;
use lineage_graphlib::{Graph, NodeId};
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// Parent first, then each child's subtree in discovery order.
    #[default]
    ParentFirst,
    /// First child's subtree, then the parent, then the remaining subtrees. The parent ends up
    /// between its daughters.
    Centered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderOptions {
    pub tracklet_id_key: String,
    pub placement: Placement,
}

impl Default for OrderOptions {
    fn default() -> Self {
        Self {
            tracklet_id_key: DEFAULT_TRACKLET_ID_KEY.to_string(),
            placement: Placement::default(),
        }
    }
}

/// Orders the tracklet ids found on `g` for plotting.
///
/// Every node must carry a tracklet id under `options.tracklet_id_key`.
pub fn order_tracklets<K, N>(g: &Graph<K, N>, options: &OrderOptions) -> Result<Vec<TrackletId>>
where
    K: NodeId,
    N: TrackletLabel + Default,
{
    let parent_of = tracklet_parents(g, &options.tracklet_id_key)?;
    Ok(order_from_parents(&parent_of, options.placement))
}

/// Orders every tracklet of an extraction, using the smallest parent id as layout parent.
///
/// Ids come from `tracklets` directly, so `options.tracklet_id_key` is not consulted.
pub fn order_parent_graph<K: NodeId>(
    tracklets: &Tracklets<K>,
    options: &OrderOptions,
) -> Vec<TrackletId> {
    let parent_of: IndexMap<TrackletId, Option<TrackletId>> = tracklets
        .tracklet_ids()
        .map(|tid| (tid, tracklets.parents_of(tid).first().copied()))
        .collect();
    order_from_parents(&parent_of, options.placement)
}

/// Tracklet -> parent tracklet (`None` for roots), in first-encounter order of `g`'s nodes.
pub fn tracklet_parents<K, N>(
    g: &Graph<K, N>,
    key: &str,
) -> Result<IndexMap<TrackletId, Option<TrackletId>>>
where
    K: NodeId,
    N: TrackletLabel + Default,
{
    let lookup = |node: &K| -> Result<TrackletId> {
        g.node(node)
            .and_then(|label| label.tracklet_id(key))
            .ok_or_else(|| Error::MissingAttribute {
                node: format!("{node:?}"),
                key: key.to_string(),
            })
    };

    let mut parent_of: IndexMap<TrackletId, Option<TrackletId>> = IndexMap::new();
    for node in g.nodes() {
        let tid = lookup(node)?;
        if parent_of.contains_key(&tid) {
            continue;
        }

        // The representative may sit inside its tracklet when nodes were inserted out of time
        // order; skip back to the first predecessor that belongs elsewhere. Self-loops never
        // count as a predecessor.
        let mut parent = None;
        let mut current = node;
        let mut seen: HashSet<&K> = HashSet::default();
        seen.insert(node);
        while let Some(pred) = first_other_predecessor(g, current) {
            let pred_tid = lookup(pred)?;
            if pred_tid != tid {
                parent = Some(pred_tid);
                break;
            }
            if !seen.insert(pred) {
                break;
            }
            current = pred;
        }
        parent_of.insert(tid, parent);
    }
    Ok(parent_of)
}

fn first_other_predecessor<'g, K, N>(g: &'g Graph<K, N>, node: &K) -> Option<&'g K>
where
    K: NodeId,
    N: Default,
{
    g.predecessors(node).into_iter().find(|&pred| pred != node)
}

enum Visit {
    Enter(TrackletId),
    Emit(TrackletId),
}

/// Lays out tracklets given each one's parent. Roots are placed in ascending id order, children
/// in the iteration order of `parent_of`.
pub fn order_from_parents(
    parent_of: &IndexMap<TrackletId, Option<TrackletId>>,
    placement: Placement,
) -> Vec<TrackletId> {
    let mut children: HashMap<TrackletId, Vec<TrackletId>> = HashMap::default();
    let mut roots: Vec<TrackletId> = Vec::new();
    for (&tid, &parent) in parent_of {
        match parent {
            Some(p) if p != tid && parent_of.contains_key(&p) => {
                children.entry(p).or_default().push(tid);
            }
            _ => roots.push(tid),
        }
    }
    roots.sort_unstable();

    let mut order: Vec<TrackletId> = Vec::with_capacity(parent_of.len());
    let mut placed: HashSet<TrackletId> = HashSet::default();
    for &root in &roots {
        place_subtree(root, &children, placement, &mut placed, &mut order);
    }

    if order.len() < parent_of.len() {
        // Parent cycles never reach a root.
        let mut stranded: Vec<TrackletId> = parent_of
            .keys()
            .copied()
            .filter(|tid| !placed.contains(tid))
            .collect();
        stranded.sort_unstable();
        tracing::debug!(count = stranded.len(), "tracklets unreachable from any root");
        for tid in stranded {
            place_subtree(tid, &children, placement, &mut placed, &mut order);
        }
    }

    tracing::debug!(tracklets = order.len(), roots = roots.len(), ?placement, "ordered tracklets");
    order
}

fn place_subtree(
    root: TrackletId,
    children: &HashMap<TrackletId, Vec<TrackletId>>,
    placement: Placement,
    placed: &mut HashSet<TrackletId>,
    order: &mut Vec<TrackletId>,
) {
    let mut stack = vec![Visit::Enter(root)];
    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Emit(tid) => order.push(tid),
            Visit::Enter(tid) => {
                if !placed.insert(tid) {
                    continue;
                }
                let kids = children.get(&tid).map_or(&[][..], Vec::as_slice);
                match (placement, kids.split_first()) {
                    (Placement::Centered, Some((&first, rest))) => {
                        stack.extend(rest.iter().rev().map(|&k| Visit::Enter(k)));
                        stack.push(Visit::Emit(tid));
                        stack.push(Visit::Enter(first));
                    }
                    _ => {
                        stack.extend(kids.iter().rev().map(|&k| Visit::Enter(k)));
                        stack.push(Visit::Emit(tid));
                    }
                }
            }
        }
    }
}
