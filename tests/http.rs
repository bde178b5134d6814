//! Router-level tests: status codes and wire shapes for every endpoint.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use waypost::server::build_router;
use waypost::SqliteStore;

fn test_router() -> Router {
    build_router(SqliteStore::open_in_memory().unwrap())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_point(app: &Router, name: &str) -> u64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/sale-points",
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_u64().unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_router();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn path_lifecycle_over_http() {
    let app = test_router();
    let a = create_point(&app, "A").await;
    let b = create_point(&app, "B").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/paths",
        Some(json!({ "idA": a, "idB": b, "cost": 5.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["salePointA"]["name"], "A");
    assert_eq!(body["salePointB"]["name"], "B");
    assert_eq!(body["cost"], 5.0);

    // Lookup succeeds in the reversed orientation too.
    let (status, body) = send(&app, Method::GET, &format!("/api/paths/{b}/{a}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cost"], 5.0);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/paths/{a}/{b}"),
        Some(json!({ "cost": 2.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cost"], 2.5);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/paths/{a}/{b}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/api/paths/{a}/{b}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cheapest_route_prefers_the_detour() {
    let app = test_router();
    let a = create_point(&app, "A").await;
    let b = create_point(&app, "B").await;
    let c = create_point(&app, "C").await;

    for (id_a, id_b, cost) in [(a, b, 2.0), (b, c, 2.0), (a, c, 10.0)] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/paths",
            Some(json!({ "idA": id_a, "idB": id_b, "cost": cost })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, &format!("/api/routes/{a}/{c}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCost"], 4.0);
    let ids: Vec<u64> = body["path"]
        .as_array()
        .unwrap()
        .iter()
        .map(|step| step["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![a, b, c]);
}

#[tokio::test]
async fn conflicts_map_to_409() {
    let app = test_router();
    let a = create_point(&app, "A").await;
    let b = create_point(&app, "B").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/paths",
        Some(json!({ "idA": a, "idB": a, "cost": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/paths",
        Some(json!({ "idA": a, "idB": b, "cost": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/paths",
        Some(json!({ "idA": b, "idB": a, "cost": 3.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/sale-points",
        Some(json!({ "name": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_input_maps_to_400() {
    let app = test_router();
    let a = create_point(&app, "A").await;
    let b = create_point(&app, "B").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/paths",
        Some(json!({ "idA": a, "idB": b, "cost": -1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/sale-points",
        Some(json!({ "name": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_resources_map_to_404() {
    let app = test_router();
    let a = create_point(&app, "A").await;

    let (status, body) = send(&app, Method::GET, "/api/sale-points/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("999"));

    let (status, _) = send(&app, Method::GET, &format!("/api/routes/{a}/999"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Unknown point id on the touching-paths listing is an empty list.
    let (status, body) = send(&app, Method::GET, "/api/paths/999", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn sale_point_crud_over_http() {
    let app = test_router();
    let id = create_point(&app, "Depot").await;

    let (status, body) = send(&app, Method::GET, "/api/sale-points", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/sale-points/{id}"),
        Some(json!({ "name": "Harbor" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Harbor");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/sale-points/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/api/sale-points/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
