//! Domain model and wire-level request bodies.
//!
//! Wire field names are camelCase (`salePointA`, `idA`, `totalCost`) to
//! match the public API of the service.

use serde::{Deserialize, Serialize};

/// Identifier of a sale point.
pub type PointId = u64;

/// A sale point: a graph vertex with a unique display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalePoint {
    /// Store-assigned identifier, immutable once created.
    pub id: PointId,
    /// Display name, unique among sale points.
    pub name: String,
}

/// A path between two sale points: an undirected, weighted edge.
///
/// The endpoints keep the orientation the row was inserted with; identity
/// is the unordered pair, so lookups succeed in either orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// First endpoint as stored.
    pub sale_point_a: SalePoint,
    /// Second endpoint as stored.
    pub sale_point_b: SalePoint,
    /// Non-negative traversal cost.
    pub cost: f64,
}

impl Edge {
    /// The endpoint ids in stored orientation.
    pub fn pair(&self) -> (PointId, PointId) {
        (self.sale_point_a.id, self.sale_point_b.id)
    }
}

/// Request body for creating a path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEdge {
    /// One endpoint.
    pub id_a: PointId,
    /// The other endpoint.
    pub id_b: PointId,
    /// Non-negative traversal cost.
    pub cost: f64,
}

/// Request body for updating a path's cost.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EdgeUpdate {
    /// The new non-negative cost.
    pub cost: f64,
}

/// Request body for creating or renaming a sale point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSalePoint {
    /// Display name; must be non-blank and unique.
    pub name: String,
}

/// One hop of a computed route.
///
/// Equality is the full tuple; two steps with equal incremental cost but
/// different sale points are different steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Sale point visited at this hop.
    pub id: PointId,
    /// Its display name.
    pub name: String,
    /// Incremental cost from the previous hop; 0 for the source.
    pub cost: f64,
}

/// A cheapest route from a source to a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Hops in source-to-destination order.
    pub path: Vec<RouteStep>,
    /// Shortest-path distance; equals the sum of all step costs.
    pub total_cost: f64,
}
