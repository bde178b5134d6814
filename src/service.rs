//! Orchestration layer: validation, cache policy, view wrapping.
//!
//! `SalePointService` owns node CRUD; `PathService` owns edge CRUD and
//! route queries. Both share one store handle; the path service also owns
//! the cache. Policy: edge and route reads are read-through/write-through;
//! every path mutation invalidates the mutated pair's edge entries and
//! evicts the whole route namespace. Sale-point mutations do not touch the
//! cache (reference behavior; see DESIGN.md).

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::cache::ServiceCache;
use crate::error::{GraphError, Result};
use crate::model::{Edge, EdgeUpdate, NewEdge, NewSalePoint, PointId, Route, SalePoint};
use crate::route::RouteEngine;
use crate::store::SqliteStore;

/// Creates the two services over a single store and a fresh cache.
pub fn build_services(store: SqliteStore) -> (SalePointService, PathService) {
    let store = Arc::new(Mutex::new(store));
    let sale_points = SalePointService {
        store: Arc::clone(&store),
    };
    let paths = PathService {
        store,
        cache: Arc::new(ServiceCache::new()),
    };
    (sale_points, paths)
}

/// CRUD over the sale point directory.
pub struct SalePointService {
    store: Arc<Mutex<SqliteStore>>,
}

impl SalePointService {
    /// Lists all sale points.
    pub fn list(&self) -> Result<Vec<SalePoint>> {
        self.store.lock().all_sale_points()
    }

    /// Looks up a sale point, failing if the id is unknown.
    pub fn get(&self, id: PointId) -> Result<SalePoint> {
        self.store
            .lock()
            .sale_point(id)?
            .ok_or(GraphError::SalePointNotFound(id))
    }

    /// Registers a new sale point with a unique, non-blank name.
    pub fn create(&self, new_point: &NewSalePoint) -> Result<SalePoint> {
        let name = validated_name(&new_point.name)?;
        let mut store = self.store.lock();
        if store.sale_point_name_exists(name)? {
            return Err(GraphError::NameAlreadyExists);
        }
        let point = store.insert_sale_point(name)?;
        info!(id = point.id, name = %point.name, "created sale point");
        Ok(point)
    }

    /// Renames an existing sale point.
    pub fn rename(&self, id: PointId, new_point: &NewSalePoint) -> Result<SalePoint> {
        let name = validated_name(&new_point.name)?;
        let mut store = self.store.lock();
        let existing = store
            .sale_point(id)?
            .ok_or(GraphError::SalePointNotFound(id))?;
        if existing.name != name && store.sale_point_name_exists(name)? {
            return Err(GraphError::NameAlreadyExists);
        }
        store.rename_sale_point(id, name)?;
        Ok(SalePoint {
            id,
            name: name.to_string(),
        })
    }

    /// Deletes a sale point.
    ///
    /// Paths referencing the point stay in the store as dangling rows;
    /// reads filter them out through the name join.
    pub fn delete(&self, id: PointId) -> Result<()> {
        if !self.store.lock().delete_sale_point(id)? {
            return Err(GraphError::SalePointNotFound(id));
        }
        info!(id, "deleted sale point");
        Ok(())
    }
}

/// Path CRUD and cheapest-route queries.
pub struct PathService {
    store: Arc<Mutex<SqliteStore>>,
    cache: Arc<ServiceCache>,
}

impl PathService {
    /// Lists all paths.
    pub fn list_all(&self) -> Result<Vec<Edge>> {
        self.store.lock().all_edges()
    }

    /// Lists the paths touching a sale point from either side.
    ///
    /// An unknown id is not an error; it yields an empty list.
    pub fn by_point(&self, id: PointId) -> Result<Vec<Edge>> {
        if let Some(edges) = self.cache.point_edges(id) {
            return Ok(edges);
        }
        let edges = self.store.lock().edges_touching(id)?;
        self.cache.put_point_edges(id, edges.clone());
        Ok(edges)
    }

    /// Looks up the path between a pair, in either orientation.
    pub fn by_pair(&self, id_a: PointId, id_b: PointId) -> Result<Edge> {
        if let Some(edge) = self.cache.edge((id_a, id_b)) {
            return Ok(edge);
        }
        let edge = self
            .store
            .lock()
            .edge(id_a, id_b)?
            .ok_or(GraphError::EdgeNotFound(id_a, id_b))?;
        self.cache.put_edge((id_a, id_b), edge.clone());
        Ok(edge)
    }

    /// Creates a path after validating the request.
    ///
    /// Rejects self-loops, negative costs, duplicate pairs in either
    /// orientation and unknown endpoints, in that order and before any
    /// write. Creation evicts every memoized route.
    pub fn create(&self, new_edge: &NewEdge) -> Result<Edge> {
        if new_edge.id_a == new_edge.id_b {
            return Err(GraphError::SelfLoop(new_edge.id_a));
        }
        let cost = validated_cost(new_edge.cost)?;

        let mut store = self.store.lock();
        if store.edge_row_exists(new_edge.id_a, new_edge.id_b)? {
            return Err(GraphError::EdgeAlreadyExists(new_edge.id_a, new_edge.id_b));
        }
        let point_a = store
            .sale_point(new_edge.id_a)?
            .ok_or(GraphError::SalePointNotFound(new_edge.id_a))?;
        let point_b = store
            .sale_point(new_edge.id_b)?
            .ok_or(GraphError::SalePointNotFound(new_edge.id_b))?;
        store.insert_edge(new_edge.id_a, new_edge.id_b, cost)?;
        drop(store);

        let edge = Edge {
            sale_point_a: point_a,
            sale_point_b: point_b,
            cost,
        };
        self.apply_mutation(new_edge.id_a, new_edge.id_b, Some(edge.clone()));
        info!(
            id_a = new_edge.id_a,
            id_b = new_edge.id_b,
            cost,
            "created path"
        );
        Ok(edge)
    }

    /// Updates the cost of an existing path, resolved in either
    /// orientation. Evicts every memoized route.
    pub fn update(&self, id_a: PointId, id_b: PointId, update: &EdgeUpdate) -> Result<Edge> {
        let cost = validated_cost(update.cost)?;

        let mut store = self.store.lock();
        let mut edge = store
            .edge(id_a, id_b)?
            .ok_or(GraphError::EdgeNotFound(id_a, id_b))?;
        store.update_edge_cost(id_a, id_b, cost)?;
        drop(store);

        edge.cost = cost;
        self.apply_mutation(id_a, id_b, Some(edge.clone()));
        info!(id_a, id_b, cost, "updated path");
        Ok(edge)
    }

    /// Deletes the path between a pair, resolved in either orientation.
    /// Evicts every memoized route.
    ///
    /// Works on the raw row, so paths left dangling by a sale-point
    /// delete can still be removed.
    pub fn delete(&self, id_a: PointId, id_b: PointId) -> Result<()> {
        if !self.store.lock().delete_edge(id_a, id_b)? {
            return Err(GraphError::EdgeNotFound(id_a, id_b));
        }
        self.apply_mutation(id_a, id_b, None);
        info!(id_a, id_b, "deleted path");
        Ok(())
    }

    /// Computes (or recalls) the cheapest route between two sale points.
    ///
    /// Results are memoized under the literal `(start, end)` request pair;
    /// the reversed query is a separate computation and entry.
    pub fn cheapest_route(&self, start: PointId, end: PointId) -> Result<Route> {
        if let Some(route) = self.cache.route((start, end)) {
            return Ok(route);
        }
        let store = self.store.lock();
        let route = RouteEngine::new(&store).cheapest_route(start, end)?;
        drop(store);
        self.cache.put_route((start, end), route.clone());
        Ok(route)
    }

    /// Shared cache handle, exposed for inspection in tests.
    pub fn cache(&self) -> &ServiceCache {
        &self.cache
    }

    fn apply_mutation(&self, id_a: PointId, id_b: PointId, fresh: Option<Edge>) {
        self.cache.invalidate_pair(id_a, id_b);
        if let Some(edge) = fresh {
            self.cache.put_edge((id_a, id_b), edge);
        }
        self.cache.clear_routes();
    }
}

fn validated_name(name: &str) -> Result<&str> {
    if name.trim().is_empty() {
        return Err(GraphError::InvalidArgument("name must not be blank".into()));
    }
    Ok(name)
}

fn validated_cost(cost: f64) -> Result<f64> {
    if !cost.is_finite() || cost < 0.0 {
        return Err(GraphError::InvalidArgument(format!(
            "cost must be a non-negative number, got {cost}"
        )));
    }
    Ok(cost)
}
