use indexmap::IndexMap;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracklets::{
    ExtractOptions, OrderOptions, Placement, SelfLoopPolicy, Tracklets, extract_tracklets,
    extract_tracklets_with, lineage_graph, order_parent_graph, order_tracklets, tracklet_parents,
};

/// Random edges over a small id range; self-loops are dropped during extraction.
fn any_edges() -> impl Strategy<Value = Vec<(u8, u8)>> {
    proptest::collection::vec((0u8..24, 0u8..24), 0..48)
}

/// Edges pointing from lower to higher ids, so the graph is acyclic like a time-ordered track.
fn forward_edges() -> impl Strategy<Value = Vec<(u8, u8)>> {
    any_edges().prop_map(|edges| {
        edges
            .into_iter()
            .filter(|(u, v)| u != v)
            .map(|(u, v)| (u.min(v), u.max(v)))
            .collect()
    })
}

/// Forward edges that keep self-loops, for runs that let extraction drop them.
fn forward_edges_with_loops() -> impl Strategy<Value = Vec<(u8, u8)>> {
    any_edges().prop_map(|edges| edges.into_iter().map(|(u, v)| (u.min(v), u.max(v))).collect())
}

fn lenient(edges: &[(u8, u8)]) -> Tracklets<u8> {
    let options = ExtractOptions {
        self_loops: SelfLoopPolicy::Ignore,
    };
    extract_tracklets_with(edges, &options).unwrap()
}

fn positions(order: &[u64]) -> BTreeMap<u64, usize> {
    order.iter().enumerate().map(|(i, &tid)| (tid, i)).collect()
}

/// Checks the parent-first layout against `parent_of`: the first child sits right after its
/// parent, each further sibling right after the previous sibling's subtree, and every subtree
/// fills one contiguous block.
fn check_parent_first(
    order: &[u64],
    parent_of: &IndexMap<u64, Option<u64>>,
) -> Result<(), TestCaseError> {
    let mut children: BTreeMap<u64, Vec<u64>> = BTreeMap::new();
    for (&tid, &parent) in parent_of {
        if let Some(parent) = parent {
            children.entry(parent).or_default().push(tid);
        }
    }

    fn subtree(tid: u64, children: &BTreeMap<u64, Vec<u64>>, out: &mut Vec<u64>) {
        out.push(tid);
        for &kid in children.get(&tid).into_iter().flatten() {
            subtree(kid, children, out);
        }
    }

    let pos = positions(order);
    for (&parent, kids) in &children {
        let mut next = pos[&parent] + 1;
        for &kid in kids {
            prop_assert_eq!(pos[&kid], next, "child {} of {} in {:?}", kid, parent, order);
            let mut members = Vec::new();
            subtree(kid, &children, &mut members);
            next += members.len();
        }
    }
    for &tid in parent_of.keys() {
        let mut members = Vec::new();
        subtree(tid, &children, &mut members);
        let start = pos[&tid];
        for member in members.iter().skip(1) {
            let at = pos[member];
            prop_assert!(
                at > start && at < start + members.len(),
                "{} outside the block of {} in {:?}",
                member,
                tid,
                order
            );
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn every_node_lands_in_exactly_one_tracklet(edges in any_edges()) {
        let t = lenient(&edges);
        let nodes: BTreeSet<u8> = edges.iter().flat_map(|&(u, v)| [u, v]).collect();

        let assigned: BTreeSet<u8> = t.node_to_tracklet().keys().copied().collect();
        prop_assert_eq!(&assigned, &nodes);

        let mut seen = BTreeSet::new();
        for tid in t.tracklet_ids() {
            let members = t.members(tid).unwrap();
            prop_assert!(!members.is_empty());
            for node in members {
                prop_assert!(seen.insert(*node), "node {} in two tracklets", node);
                prop_assert_eq!(t.tracklet_of(node), Some(tid));
            }
        }
        prop_assert_eq!(seen, nodes);
    }

    #[test]
    fn parent_lists_are_sorted_and_unique(edges in any_edges()) {
        let t = lenient(&edges);
        for (child, parents) in t.parent_graph() {
            prop_assert!(!parents.is_empty());
            prop_assert!(parents.windows(2).all(|w| w[0] < w[1]), "{:?}", parents);
            prop_assert!((1..=t.tracklet_count() as u64).contains(child));
        }
    }

    #[test]
    fn tracklets_break_exactly_at_divisions_and_merges(edges in forward_edges()) {
        let t = extract_tracklets(&edges).unwrap();
        let mut out_degree: BTreeMap<u8, usize> = BTreeMap::new();
        let mut in_degree: BTreeMap<u8, usize> = BTreeMap::new();
        for &(u, v) in &edges {
            *out_degree.entry(u).or_default() += 1;
            *in_degree.entry(v).or_default() += 1;
        }

        for &(u, v) in &edges {
            let linear = out_degree[&u] == 1 && in_degree[&v] == 1;
            let shared = t.tracklet_of(&u) == t.tracklet_of(&v);
            prop_assert_eq!(linear, shared, "edge {} -> {}", u, v);
        }
    }

    #[test]
    fn tree_order_lists_each_tracklet_once(edges in any_edges(), centered in any::<bool>()) {
        let t = lenient(&edges);
        let g = lineage_graph(&edges, &t, "tracklet_id");
        let placement = if centered { Placement::Centered } else { Placement::ParentFirst };
        let options = OrderOptions { placement, ..Default::default() };

        let mut order = order_tracklets(&g, &options).unwrap();
        order.sort_unstable();
        prop_assert_eq!(order, t.tracklet_ids().collect::<Vec<_>>());

        let mut dag_order = order_parent_graph(&t, &options);
        dag_order.sort_unstable();
        prop_assert_eq!(dag_order, t.tracklet_ids().collect::<Vec<_>>());
    }

    #[test]
    fn children_come_after_their_parent(edges in forward_edges()) {
        let t = extract_tracklets(&edges).unwrap();
        let g = lineage_graph(&edges, &t, "tracklet_id");

        let order = order_tracklets(&g, &OrderOptions::default()).unwrap();
        let pos = positions(&order);
        for (tid, parent) in tracklet_parents(&g, "tracklet_id").unwrap() {
            if let Some(parent) = parent {
                prop_assert!(pos[&parent] < pos[&tid], "{} before parent {}", tid, parent);
            }
        }

        let dag_order = order_parent_graph(&t, &OrderOptions::default());
        let pos = positions(&dag_order);
        for (child, parents) in t.parent_graph() {
            prop_assert!(pos[&parents[0]] < pos[child]);
        }
    }

    #[test]
    fn parent_first_subtrees_are_contiguous(edges in forward_edges_with_loops()) {
        let t = lenient(&edges);
        let g = lineage_graph(&edges, &t, "tracklet_id");

        let parent_of = tracklet_parents(&g, "tracklet_id").unwrap();
        let order = order_tracklets(&g, &OrderOptions::default()).unwrap();
        check_parent_first(&order, &parent_of)?;

        let first_parent: IndexMap<u64, Option<u64>> = t
            .tracklet_ids()
            .map(|tid| (tid, t.parents_of(tid).first().copied()))
            .collect();
        let dag_order = order_parent_graph(&t, &OrderOptions::default());
        check_parent_first(&dag_order, &first_parent)?;
    }
}
