//! Graph configuration options.

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphOptions {
    /// Keep repeated `(v, w)` edges instead of collapsing them into one.
    pub multigraph: bool,
}
