// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::HeaderValue, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::{debug, error};
use vitrine_query::{query_products, QueryLimits};

use crate::api::{
    parse_list_products_params, CategoryListEnvelope, DepartmentListEnvelope, ErrorEnvelope,
    ProductEnvelope, ProductListEnvelope,
};
use crate::AppState;

pub async fn landing_handler() -> impl IntoResponse {
    Json(json!({
        "status": "success",
        "message": "Vitrine catalog API. See /api/products."
    }))
}

pub async fn healthz_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "environment": state.config.environment,
    }))
}

pub async fn list_products_handler(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<BTreeMap<String, String>>,
) -> Response {
    let req = match parse_list_products_params(
        &raw,
        state.config.page_size_default,
        state.config.max_page_size,
    ) {
        Ok(req) => req,
        Err(err) => {
            debug!(%err, "rejected product list request");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorEnvelope::invalid_param(err.to_string())),
            )
                .into_response();
        }
    };
    let limits = QueryLimits {
        max_page_size: state.config.max_page_size,
        ..QueryLimits::default()
    };
    let conn = state.conn.lock().await;
    match query_products(&conn, &req, &limits) {
        Ok(page) => Json(ProductListEnvelope::from_page(page)).into_response(),
        Err(err) => internal_error(&state, &err.to_string()),
    }
}

pub async fn product_by_id_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    // A non-numeric id can never name a product, so it is a plain 404.
    let Ok(id) = id.parse::<i64>() else {
        return not_found();
    };
    let conn = state.conn.lock().await;
    match vitrine_store::product_by_id(&conn, id) {
        Ok(Some(product)) => Json(ProductEnvelope::new(product)).into_response(),
        Ok(None) => not_found(),
        Err(err) => internal_error(&state, &err.to_string()),
    }
}

pub async fn departments_handler(State(state): State<Arc<AppState>>) -> Response {
    let conn = state.conn.lock().await;
    match vitrine_store::list_departments(&conn) {
        Ok(departments) => Json(DepartmentListEnvelope::new(departments)).into_response(),
        Err(err) => internal_error(&state, &err.to_string()),
    }
}

pub async fn categories_handler(State(state): State<Arc<AppState>>) -> Response {
    let conn = state.conn.lock().await;
    match vitrine_store::distinct_categories(&conn) {
        Ok(categories) => Json(CategoryListEnvelope::new(categories)).into_response(),
        Err(err) => internal_error(&state, &err.to_string()),
    }
}

pub async fn fallback_handler(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorEnvelope::route_not_found(uri.path())),
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorEnvelope::product_not_found()),
    )
        .into_response()
}

fn internal_error(state: &AppState, detail: &str) -> Response {
    error!(detail, "request failed");
    let exposed = state
        .config
        .environment
        .is_development()
        .then(|| detail.to_string());
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorEnvelope::internal(exposed)),
    )
        .into_response()
}

pub async fn cors_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    if let Ok(origin) = HeaderValue::from_str(&state.config.cors_origin) {
        response
            .headers_mut()
            .insert("access-control-allow-origin", origin);
    }
    response
}
