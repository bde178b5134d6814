//! Cheapest-route engine.
//!
//! Lazy-deletion Dijkstra over the [`GraphAdapter`]: relaxing a neighbor
//! pushes a fresh frontier entry instead of decreasing a key, and entries
//! superseded by a cheaper push are discarded on pop via the visited set.
//! All search state is owned by a single invocation and dropped with it.
//!
//! Costs are summed with plain `f64` addition and compared with plain `<`
//! (no epsilon), so ties between float-accumulated paths may resolve
//! differently across platforms.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::debug;

use crate::error::{GraphError, Result};
use crate::graph::GraphAdapter;
use crate::model::{PointId, Route, RouteStep};
use crate::store::SqliteStore;

/// Frontier entry; `Ord` is inverted so `BinaryHeap` pops the cheapest.
struct FrontierEntry {
    id: PointId,
    cost: f64,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Costs are validated non-negative reals, never NaN.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Single-source cheapest-path search over the stored graph.
pub struct RouteEngine<'a> {
    store: &'a SqliteStore,
}

impl<'a> RouteEngine<'a> {
    /// Creates an engine reading from the given store.
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    /// Computes the cheapest route from `start` to `end`.
    ///
    /// Fails with [`GraphError::SalePointNotFound`] if either endpoint is
    /// missing from the directory and with [`GraphError::NoRoute`] if the
    /// frontier drains before reaching `end`. When `start == end` the
    /// route is a single zero-cost step.
    pub fn cheapest_route(&self, start: PointId, end: PointId) -> Result<Route> {
        let start_point = self
            .store
            .sale_point(start)?
            .ok_or(GraphError::SalePointNotFound(start))?;
        let end_point = self
            .store
            .sale_point(end)?
            .ok_or(GraphError::SalePointNotFound(end))?;

        let adapter = GraphAdapter::new(self.store);

        let mut names: HashMap<PointId, String> = HashMap::new();
        names.insert(start, start_point.name);
        names.insert(end, end_point.name);

        let mut adjacency: HashMap<PointId, Vec<(PointId, f64)>> = HashMap::new();
        let mut costs: HashMap<PointId, f64> = HashMap::new();
        let mut previous: HashMap<PointId, Option<PointId>> = HashMap::new();
        let mut visited: HashSet<PointId> = HashSet::new();
        let mut frontier = BinaryHeap::new();

        costs.insert(start, 0.0);
        previous.insert(start, None);
        frontier.push(FrontierEntry {
            id: start,
            cost: 0.0,
        });

        while let Some(current) = frontier.pop() {
            if !visited.insert(current.id) {
                // Stale entry; a cheaper push already finalized this point.
                continue;
            }
            debug!(point = current.id, cost = current.cost, "visiting sale point");

            if current.id == end {
                return Ok(build_route(end, &previous, &costs, &names));
            }

            if !adjacency.contains_key(&current.id) {
                let mut list = Vec::new();
                for neighbor in adapter.neighbors(current.id)? {
                    names.entry(neighbor.point.id).or_insert(neighbor.point.name);
                    costs.entry(neighbor.point.id).or_insert(f64::INFINITY);
                    previous.entry(neighbor.point.id).or_insert(None);
                    list.push((neighbor.point.id, neighbor.cost));
                }
                adjacency.insert(current.id, list);
            }

            for &(neighbor_id, edge_cost) in &adjacency[&current.id] {
                if visited.contains(&neighbor_id) {
                    continue;
                }
                let candidate = current.cost + edge_cost;
                if candidate < costs[&neighbor_id] {
                    costs.insert(neighbor_id, candidate);
                    previous.insert(neighbor_id, Some(current.id));
                    frontier.push(FrontierEntry {
                        id: neighbor_id,
                        cost: candidate,
                    });
                    debug!(point = neighbor_id, cost = candidate, "relaxed sale point");
                }
            }
        }

        Err(GraphError::NoRoute(start, end))
    }
}

/// Walks predecessors from the destination back to the source and reverses
/// the result. Each step's cost is the increment over its predecessor.
fn build_route(
    end: PointId,
    previous: &HashMap<PointId, Option<PointId>>,
    costs: &HashMap<PointId, f64>,
    names: &HashMap<PointId, String>,
) -> Route {
    let mut steps = Vec::new();
    let mut cursor = Some(end);

    while let Some(id) = cursor {
        let prev = previous.get(&id).copied().flatten();
        let step_cost = costs[&id] - prev.map(|p| costs[&p]).unwrap_or(0.0);
        steps.push(RouteStep {
            id,
            name: names[&id].clone(),
            cost: step_cost,
        });
        cursor = prev;
    }

    steps.reverse();
    Route {
        total_cost: costs[&end],
        path: steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontier_pops_cheapest_first() {
        let mut heap = BinaryHeap::new();
        heap.push(FrontierEntry { id: 1, cost: 4.0 });
        heap.push(FrontierEntry { id: 2, cost: 0.5 });
        heap.push(FrontierEntry { id: 3, cost: 2.0 });

        let order: Vec<PointId> = std::iter::from_fn(|| heap.pop().map(|e| e.id)).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn detour_beats_expensive_direct_edge() -> Result<()> {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let a = store.insert_sale_point("A")?;
        let b = store.insert_sale_point("B")?;
        let c = store.insert_sale_point("C")?;
        store.insert_edge(a.id, b.id, 2.0)?;
        store.insert_edge(b.id, c.id, 2.0)?;
        store.insert_edge(a.id, c.id, 10.0)?;

        let route = RouteEngine::new(&store).cheapest_route(a.id, c.id)?;
        let ids: Vec<PointId> = route.path.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
        assert_eq!(route.total_cost, 4.0);
        assert_eq!(route.path[0].cost, 0.0);
        assert_eq!(route.path[1].cost, 2.0);
        assert_eq!(route.path[2].cost, 2.0);

        Ok(())
    }

    #[test]
    fn source_equals_destination_is_a_zero_cost_step() -> Result<()> {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let a = store.insert_sale_point("A")?;

        let route = RouteEngine::new(&store).cheapest_route(a.id, a.id)?;
        assert_eq!(route.total_cost, 0.0);
        assert_eq!(route.path.len(), 1);
        assert_eq!(route.path[0].id, a.id);
        assert_eq!(route.path[0].name, "A");
        assert_eq!(route.path[0].cost, 0.0);

        Ok(())
    }

    #[test]
    fn unreachable_destination_is_no_route() -> Result<()> {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let a = store.insert_sale_point("A")?;
        let b = store.insert_sale_point("B")?;

        let err = RouteEngine::new(&store).cheapest_route(a.id, b.id).unwrap_err();
        assert!(matches!(err, GraphError::NoRoute(from, to) if from == a.id && to == b.id));

        Ok(())
    }

    #[test]
    fn missing_endpoint_fails_before_searching() -> Result<()> {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let a = store.insert_sale_point("A")?;

        let err = RouteEngine::new(&store).cheapest_route(a.id, 999).unwrap_err();
        assert!(matches!(err, GraphError::SalePointNotFound(999)));

        let err = RouteEngine::new(&store).cheapest_route(999, a.id).unwrap_err();
        assert!(matches!(err, GraphError::SalePointNotFound(999)));

        Ok(())
    }
}
