//! HTTP surface over the services.
//!
//! Thin adapters only: handlers parse parameters, delegate to the service
//! layer and map the error taxonomy onto status codes (not-found kinds to
//! 404, conflict kinds to 409, invalid input to 400).

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::error::{GraphError, Result};
use crate::model::{Edge, EdgeUpdate, NewEdge, NewSalePoint, PointId, Route, SalePoint};
use crate::service::{build_services, PathService, SalePointService};
use crate::store::SqliteStore;

/// Runtime options used to boot the HTTP server.
#[derive(Clone, Debug)]
pub struct ServerOptions {
    /// Path to the SQLite database file, created if missing.
    pub db_path: PathBuf,
    /// Network interface to bind to.
    pub host: IpAddr,
    /// Listening port.
    pub port: u16,
}

struct AppState {
    sale_points: SalePointService,
    paths: PathService,
}

type SharedState = Arc<AppState>;

/// Opens the store, binds the listener and serves until ctrl-c.
pub async fn serve(options: ServerOptions) -> Result<()> {
    let store = SqliteStore::open(&options.db_path)?;
    let app = build_router(store);

    let addr = SocketAddr::from((options.host, options.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, db_path = %options.db_path.display(), "waypost listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Builds the router and its service state over the given store.
pub fn build_router(store: SqliteStore) -> Router {
    let (sale_points, paths) = build_services(store);
    let state = Arc::new(AppState { sale_points, paths });

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/sale-points",
            get(list_sale_points).post(create_sale_point),
        )
        .route(
            "/api/sale-points/:id",
            get(get_sale_point)
                .put(rename_sale_point)
                .delete(delete_sale_point),
        )
        .route("/api/paths", get(list_paths).post(create_path))
        .route("/api/paths/:id", get(paths_by_point))
        .route(
            "/api/paths/:id_a/:id_b",
            get(get_path).put(update_path).delete(delete_path),
        )
        .route("/api/routes/:id_a/:id_b", get(cheapest_route))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn list_sale_points(State(state): State<SharedState>) -> ApiResult<Json<Vec<SalePoint>>> {
    Ok(Json(state.sale_points.list()?))
}

async fn create_sale_point(
    State(state): State<SharedState>,
    Json(body): Json<NewSalePoint>,
) -> ApiResult<(StatusCode, Json<SalePoint>)> {
    let point = state.sale_points.create(&body)?;
    Ok((StatusCode::CREATED, Json(point)))
}

async fn get_sale_point(
    State(state): State<SharedState>,
    Path(id): Path<PointId>,
) -> ApiResult<Json<SalePoint>> {
    Ok(Json(state.sale_points.get(id)?))
}

async fn rename_sale_point(
    State(state): State<SharedState>,
    Path(id): Path<PointId>,
    Json(body): Json<NewSalePoint>,
) -> ApiResult<Json<SalePoint>> {
    Ok(Json(state.sale_points.rename(id, &body)?))
}

async fn delete_sale_point(
    State(state): State<SharedState>,
    Path(id): Path<PointId>,
) -> ApiResult<StatusCode> {
    state.sale_points.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_paths(State(state): State<SharedState>) -> ApiResult<Json<Vec<Edge>>> {
    Ok(Json(state.paths.list_all()?))
}

async fn paths_by_point(
    State(state): State<SharedState>,
    Path(id): Path<PointId>,
) -> ApiResult<Json<Vec<Edge>>> {
    Ok(Json(state.paths.by_point(id)?))
}

async fn get_path(
    State(state): State<SharedState>,
    Path((id_a, id_b)): Path<(PointId, PointId)>,
) -> ApiResult<Json<Edge>> {
    Ok(Json(state.paths.by_pair(id_a, id_b)?))
}

async fn create_path(
    State(state): State<SharedState>,
    Json(body): Json<NewEdge>,
) -> ApiResult<(StatusCode, Json<Edge>)> {
    let edge = state.paths.create(&body)?;
    Ok((StatusCode::CREATED, Json(edge)))
}

async fn update_path(
    State(state): State<SharedState>,
    Path((id_a, id_b)): Path<(PointId, PointId)>,
    Json(body): Json<EdgeUpdate>,
) -> ApiResult<Json<Edge>> {
    Ok(Json(state.paths.update(id_a, id_b, &body)?))
}

async fn delete_path(
    State(state): State<SharedState>,
    Path((id_a, id_b)): Path<(PointId, PointId)>,
) -> ApiResult<StatusCode> {
    state.paths.delete(id_a, id_b)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn cheapest_route(
    State(state): State<SharedState>,
    Path((id_a, id_b)): Path<(PointId, PointId)>,
) -> ApiResult<Json<Route>> {
    Ok(Json(state.paths.cheapest_route(id_a, id_b)?))
}

type ApiResult<T> = std::result::Result<T, ApiError>;

struct ApiError(GraphError);

impl From<GraphError> for ApiError {
    fn from(err: GraphError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            GraphError::SalePointNotFound(_)
            | GraphError::EdgeNotFound(..)
            | GraphError::NoRoute(..) => StatusCode::NOT_FOUND,
            GraphError::EdgeAlreadyExists(..)
            | GraphError::SelfLoop(_)
            | GraphError::NameAlreadyExists => StatusCode::CONFLICT,
            GraphError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            GraphError::Storage(_) | GraphError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = Json(ErrorPayload {
            message: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorPayload {
    message: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => tracing::error!(?err, "failed to listen for shutdown signal"),
    }
}
