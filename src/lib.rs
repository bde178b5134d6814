//! Waypost: a sale-point routing service.
//!
//! Sale points are graph nodes with unique display names; paths are
//! weighted undirected edges between them, persisted in SQLite. The crate
//! answers cheapest-route queries with a Dijkstra engine that builds its
//! adjacency view lazily from the store, and memoizes results in a cache
//! that is cleared wholesale whenever a path is mutated.

pub mod cache;
pub mod error;
pub mod graph;
pub mod logging;
pub mod model;
pub mod route;
pub mod server;
pub mod service;
pub mod store;

pub use error::{GraphError, Result};
pub use model::{Edge, EdgeUpdate, NewEdge, NewSalePoint, PointId, Route, RouteStep, SalePoint};
pub use route::RouteEngine;
pub use service::{build_services, PathService, SalePointService};
pub use store::SqliteStore;
