//! Process-lifetime memoization of edge lookups and route results.
//!
//! Two logical namespaces per the service's consistency policy: edge
//! lookups (by literal endpoint pair and by single point id) and route
//! results keyed by the literal `(source, destination)` request pair. A
//! query for `(B, A)` after caching `(A, B)` is a distinct entry and is
//! recomputed. Entries never expire and there is no capacity bound; the
//! route namespace is evicted wholesale on any path mutation.
//!
//! Each namespace sits behind its own `RwLock`, so reads are concurrent
//! and eviction is atomic with respect to readers.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::model::{Edge, PointId, Route};

/// Shared cache for the path and route services.
#[derive(Default)]
pub struct ServiceCache {
    edges_by_pair: RwLock<HashMap<(PointId, PointId), Edge>>,
    edges_by_point: RwLock<HashMap<PointId, Vec<Edge>>>,
    routes: RwLock<HashMap<(PointId, PointId), Route>>,
}

impl ServiceCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached edge view for the literal pair, if any.
    pub fn edge(&self, pair: (PointId, PointId)) -> Option<Edge> {
        self.edges_by_pair.read().get(&pair).cloned()
    }

    /// Stores an edge view under the literal pair it was requested as.
    pub fn put_edge(&self, pair: (PointId, PointId), edge: Edge) {
        self.edges_by_pair.write().insert(pair, edge);
    }

    /// Cached list of edges touching a point, if any.
    pub fn point_edges(&self, id: PointId) -> Option<Vec<Edge>> {
        self.edges_by_point.read().get(&id).cloned()
    }

    /// Stores the list of edges touching a point.
    pub fn put_point_edges(&self, id: PointId, edges: Vec<Edge>) {
        self.edges_by_point.write().insert(id, edges);
    }

    /// Cached route for the literal `(source, destination)` pair, if any.
    pub fn route(&self, pair: (PointId, PointId)) -> Option<Route> {
        self.routes.read().get(&pair).cloned()
    }

    /// Stores a route under the literal pair it was queried as.
    pub fn put_route(&self, pair: (PointId, PointId), route: Route) {
        self.routes.write().insert(pair, route);
    }

    /// Drops the edge entries a mutation of the pair can make stale: both
    /// orientations of the pair lookup and both endpoints' touching lists.
    pub fn invalidate_pair(&self, a: PointId, b: PointId) {
        {
            let mut pairs = self.edges_by_pair.write();
            pairs.remove(&(a, b));
            pairs.remove(&(b, a));
        }
        let mut points = self.edges_by_point.write();
        points.remove(&a);
        points.remove(&b);
    }

    /// Evicts the entire route namespace.
    pub fn clear_routes(&self) {
        self.routes.write().clear();
    }

    /// Number of memoized routes.
    pub fn route_count(&self) -> usize {
        self.routes.read().len()
    }
}
