// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! The Vitrine HTTP server.
//!
//! Serves the catalog read API over a single SQLite store. Writes happen
//! out of band through the CLI, so one shared connection behind an async
//! lock is enough.

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use rusqlite::Connection;
use tokio::sync::Mutex;

pub mod api;
pub mod config;
pub mod http;

pub use config::{Environment, ServerConfig};

pub const CRATE_NAME: &str = "vitrine-server";

pub struct AppState {
    pub config: ServerConfig,
    pub conn: Mutex<Connection>,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig, conn: Connection) -> Self {
        Self {
            config,
            conn: Mutex::new(conn),
        }
    }
}

#[must_use]
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(http::landing_handler))
        .route("/healthz", get(http::healthz_handler))
        .route("/api/products", get(http::list_products_handler))
        .route("/api/products/departments", get(http::departments_handler))
        .route("/api/products/categories", get(http::categories_handler))
        .route("/api/products/:id", get(http::product_by_id_handler))
        .fallback(http::fallback_handler)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            http::cors_middleware,
        ))
        .with_state(state)
}
