//! Per-node predecessor lists used by [`Graph`](super::Graph).
//!
//! Lineage queries ask for predecessors of almost every node, so the lists are maintained on
//! insert instead of scanning all edges per query.

#[derive(Debug, Clone, Default)]
pub(in crate::graph) struct Adjacency {
    in_: Vec<Vec<usize>>,
}

impl Adjacency {
    pub(in crate::graph) fn add_node(&mut self) {
        self.in_.push(Vec::new());
    }

    pub(in crate::graph) fn add_edge(&mut self, v_ix: usize, w_ix: usize) {
        self.in_[w_ix].push(v_ix);
    }

    pub(in crate::graph) fn in_nodes(&self, v_ix: usize) -> &[usize] {
        &self.in_[v_ix]
    }
}
