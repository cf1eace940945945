//! Edge-list input validation.
//!
//! A typed `&[(K, K)]` is always well shaped; [`EdgeList`] is the entry point for untyped,
//! array-like input (rows read from JSON, a flattened `(N, 2)` buffer) and enforces the shape
//! before any traversal runs.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeList<K> {
    edges: Vec<(K, K)>,
}

impl<K> EdgeList<K> {
    pub fn new(edges: Vec<(K, K)>) -> Self {
        Self { edges }
    }

    /// Accepts rows of an `(N, 2)` table; every row must hold exactly two node ids.
    pub fn from_rows(rows: Vec<Vec<K>>) -> Result<Self> {
        let mut edges = Vec::with_capacity(rows.len());
        for (row_ix, row) in rows.into_iter().enumerate() {
            let len = row.len();
            let mut it = row.into_iter();
            match (it.next(), it.next(), it.next()) {
                (Some(u), Some(v), None) => edges.push((u, v)),
                _ => {
                    return Err(Error::invalid_input(format!(
                        "row {row_ix} has {len} columns, expected 2"
                    )));
                }
            }
        }
        Ok(Self { edges })
    }

    /// Accepts a row-major buffer together with its array shape, which must be `[n, 2]`.
    pub fn from_flat(values: Vec<K>, shape: &[usize]) -> Result<Self> {
        let &[n, cols] = shape else {
            return Err(Error::invalid_input(format!(
                "expected a two-dimensional (N, 2) array, got shape {shape:?}"
            )));
        };
        if cols != 2 {
            return Err(Error::invalid_input(format!(
                "expected 2 columns, got shape {shape:?}"
            )));
        }
        if n.checked_mul(2) != Some(values.len()) {
            return Err(Error::invalid_input(format!(
                "shape {shape:?} does not match {} values",
                values.len()
            )));
        }

        let mut edges = Vec::with_capacity(n);
        let mut it = values.into_iter();
        while let (Some(u), Some(v)) = (it.next(), it.next()) {
            edges.push((u, v));
        }
        Ok(Self { edges })
    }

    pub fn as_slice(&self) -> &[(K, K)] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn into_inner(self) -> Vec<(K, K)> {
        self.edges
    }
}

impl<K> From<Vec<(K, K)>> for EdgeList<K> {
    fn from(edges: Vec<(K, K)>) -> Self {
        Self::new(edges)
    }
}

impl<K> From<Vec<[K; 2]>> for EdgeList<K> {
    fn from(rows: Vec<[K; 2]>) -> Self {
        Self::new(rows.into_iter().map(|[u, v]| (u, v)).collect())
    }
}

impl<K> AsRef<[(K, K)]> for EdgeList<K> {
    fn as_ref(&self) -> &[(K, K)] {
        &self.edges
    }
}
