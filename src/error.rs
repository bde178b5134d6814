//! Error handling for Waypost operations.
//!
//! All public APIs return `Result<T, GraphError>`. Validation errors are
//! raised before any store mutation; storage errors propagate unchanged.

use std::io;
use thiserror::Error;

use crate::model::PointId;

/// Result type for Waypost operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while managing sale points, paths and routes.
#[derive(Debug, Error)]
pub enum GraphError {
    /// No sale point exists with the given id.
    #[error("sale point not found with id {0}")]
    SalePointNotFound(PointId),

    /// No path exists between the two sale points, in either orientation.
    #[error("path not found between sale points {0} and {1}")]
    EdgeNotFound(PointId, PointId),

    /// A path between the two sale points already exists, in some orientation.
    #[error("path already exists between sale points {0} and {1}")]
    EdgeAlreadyExists(PointId, PointId),

    /// A path cannot connect a sale point to itself.
    #[error("sale point {0} cannot be connected to itself")]
    SelfLoop(PointId),

    /// Another sale point already uses the requested name.
    #[error("sale point name is already in use")]
    NameAlreadyExists,

    /// The destination is unreachable from the source.
    #[error("no route exists between sale points {0} and {1}")]
    NoRoute(PointId, PointId),

    /// Invalid request data (blank name, negative cost, bad log level).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Error from the underlying SQLite store.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// I/O error from the underlying filesystem or network listener.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
