//! Lazy adjacency view over the path store.

use std::collections::HashSet;

use crate::error::Result;
use crate::model::{PointId, SalePoint};
use crate::store::SqliteStore;

/// One adjacent sale point and the cost of the path reaching it.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// The adjacent sale point.
    pub point: SalePoint,
    /// Cost of the connecting path.
    pub cost: f64,
}

/// Translates stored path rows into adjacency lists on demand.
///
/// No adjacency is retained between calls; the store is the source of
/// truth for each per-call snapshot.
pub struct GraphAdapter<'a> {
    store: &'a SqliteStore,
}

impl<'a> GraphAdapter<'a> {
    /// Creates an adapter reading from the given store.
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    /// Lists the neighbors of a sale point with the path cost to each.
    ///
    /// Rows are fetched from both endpoint perspectives, so the same
    /// logical path is deduplicated on its unordered pair identity. No
    /// stored orientation is assumed.
    pub fn neighbors(&self, id: PointId) -> Result<Vec<Neighbor>> {
        let mut seen = HashSet::new();
        let mut neighbors = Vec::new();

        for edge in self.store.edges_touching(id)? {
            let other = if edge.sale_point_a.id == id {
                edge.sale_point_b
            } else {
                edge.sale_point_a
            };
            if seen.insert(pair_key(id, other.id)) {
                neighbors.push(Neighbor {
                    point: other,
                    cost: edge.cost,
                });
            }
        }

        Ok(neighbors)
    }
}

fn pair_key(a: PointId, b: PointId) -> (PointId, PointId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
