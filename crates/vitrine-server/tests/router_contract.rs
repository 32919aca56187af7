// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use rusqlite::Connection;
use tower::ServiceExt;
use vitrine_model::Product;
use vitrine_server::{build_router, AppState, Environment, ServerConfig};
use vitrine_store::{create_schema, replace_all_products};

fn widget() -> Product {
    Product {
        id: 5,
        name: "Widget".to_string(),
        cost: 2.0,
        retail_price: 4.0,
        category: "Tools".to_string(),
        brand: "Acme".to_string(),
        department: "Hardware".to_string(),
        department_id: None,
        sku: "SKU5".to_string(),
        distribution_center_id: 1,
    }
}

fn seeded_state(environment: Environment) -> Arc<AppState> {
    let mut conn = Connection::open_in_memory().expect("open memory db");
    create_schema(&conn).expect("schema");
    replace_all_products(&mut conn, &[widget()]).expect("seed");
    let config = ServerConfig {
        environment,
        ..ServerConfig::default()
    };
    Arc::new(AppState::new(config, conn))
}

/// A state whose products table is gone, so every catalog query fails.
fn broken_state(environment: Environment) -> Arc<AppState> {
    let conn = Connection::open_in_memory().expect("open memory db");
    create_schema(&conn).expect("schema");
    conn.execute_batch("DROP TABLE products").expect("break store");
    let config = ServerConfig {
        environment,
        ..ServerConfig::default()
    };
    Arc::new(AppState::new(config, conn))
}

async fn get(state: Arc<AppState>, uri: &str) -> Response {
    build_router(state)
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response")
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn list_products_returns_the_full_envelope() {
    let response = get(seeded_state(Environment::Development), "/api/products").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["total"], 1);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pages"], 1);
    assert_eq!(body["data"][0]["id"], 5);
}

#[tokio::test]
async fn product_lookup_round_trips_and_missing_id_is_404() {
    let state = seeded_state(Environment::Development);

    let found = get(Arc::clone(&state), "/api/products/5").await;
    assert_eq!(found.status(), StatusCode::OK);
    let body = body_json(found).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Widget");

    let missing = get(state, "/api/products/999").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body = body_json(missing).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn non_numeric_id_is_a_product_404_not_a_route_404() {
    let response = get(seeded_state(Environment::Development), "/api/products/abc").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Product not found");
    assert!(body.get("path").is_none());
}

#[tokio::test]
async fn unmatched_routes_hit_the_fallback_with_the_path() {
    let response = get(seeded_state(Environment::Development), "/api/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route not found");
    assert_eq!(body["path"], "/api/nope");
}

#[tokio::test]
async fn invalid_query_params_are_400_not_500() {
    let response = get(
        seeded_state(Environment::Development),
        "/api/products?page=0",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn every_response_carries_the_configured_cors_origin() {
    let response = get(seeded_state(Environment::Development), "/api/products").await;
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    let fallback = get(seeded_state(Environment::Development), "/missing").await;
    assert!(fallback.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn store_failure_detail_shows_in_development_only() {
    let dev = get(broken_state(Environment::Development), "/api/products").await;
    assert_eq!(dev.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(dev).await;
    assert_eq!(body["message"], "Something went wrong!");
    assert!(body["error"].as_str().is_some());

    let prod = get(broken_state(Environment::Production), "/api/products").await;
    assert_eq!(prod.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(prod).await;
    assert_eq!(body["message"], "Something went wrong!");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn department_and_category_routes_enumerate_the_store() {
    let state = seeded_state(Environment::Development);

    let departments = get(Arc::clone(&state), "/api/products/departments").await;
    assert_eq!(departments.status(), StatusCode::OK);
    let body = body_json(departments).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "Hardware");

    let categories = get(state, "/api/products/categories").await;
    assert_eq!(categories.status(), StatusCode::OK);
    let body = body_json(categories).await;
    assert_eq!(body["data"][0], "Tools");
}
