//! Directed graph container keyed by generic node ids.
//!
//! Nodes keep their insertion order, which is the iteration order every query exposes. Edge
//! order is preserved per node as well, so "the first predecessor" of a node is well defined:
//! it is the source of the earliest inserted edge ending at that node.

use rustc_hash::FxBuildHasher;

mod adjacency;
mod node_id;
mod options;

use adjacency::Adjacency;
pub use node_id::NodeId;
pub use options::GraphOptions;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

#[derive(Debug, Clone)]
struct NodeEntry<K, N> {
    id: K,
    label: N,
}

#[derive(Debug, Clone)]
pub struct Graph<K, N> {
    options: GraphOptions,

    nodes: Vec<NodeEntry<K, N>>,
    node_index: HashMap<K, usize>,

    edges: Vec<(usize, usize)>,
    edge_index: HashSet<(usize, usize)>,

    adj: Adjacency,
}

impl<K, N> Default for Graph<K, N>
where
    K: NodeId,
    N: Default,
{
    fn default() -> Self {
        Self::new(GraphOptions::default())
    }
}

impl<K, N> Graph<K, N>
where
    K: NodeId,
    N: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashSet::default(),
            adj: Adjacency::default(),
        }
    }

    fn index_of(&self, id: &K) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    fn ensure_index(&mut self, id: K) -> usize {
        if let Some(idx) = self.index_of(&id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.node_index.insert(id.clone(), idx);
        self.nodes.push(NodeEntry {
            id,
            label: N::default(),
        });
        self.adj.add_node();
        idx
    }

    pub fn set_node(&mut self, id: K, label: N) -> &mut Self {
        let idx = self.ensure_index(id);
        self.nodes[idx].label = label;
        self
    }

    pub fn node(&self, id: &K) -> Option<&N> {
        self.index_of(id).map(|idx| &self.nodes[idx].label)
    }

    pub fn node_mut(&mut self, id: &K) -> Option<&mut N> {
        self.index_of(id).map(move |idx| &mut self.nodes[idx].label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &K> {
        self.nodes.iter().map(|n| &n.id)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&K, &K)> {
        self.edges
            .iter()
            .map(|&(v, w)| (&self.nodes[v].id, &self.nodes[w].id))
    }

    /// Adds the edge `v -> w`, creating missing endpoints with default labels.
    ///
    /// Without [`GraphOptions::multigraph`], repeating an existing edge is a no-op.
    pub fn set_edge(&mut self, v: K, w: K) -> &mut Self {
        let v_ix = self.ensure_index(v);
        let w_ix = self.ensure_index(w);
        if !self.edge_index.insert((v_ix, w_ix)) && !self.options.multigraph {
            return self;
        }
        self.edges.push((v_ix, w_ix));
        self.adj.add_edge(v_ix, w_ix);
        self
    }

    pub fn predecessors(&self, v: &K) -> Vec<&K> {
        let Some(v_ix) = self.index_of(v) else {
            return Vec::new();
        };
        self.adj
            .in_nodes(v_ix)
            .iter()
            .map(|&u_ix| &self.nodes[u_ix].id)
            .collect()
    }
}
