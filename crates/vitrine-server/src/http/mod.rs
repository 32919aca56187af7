// SPDX-License-Identifier: Apache-2.0

//! HTTP handlers and middleware for the catalog routes.

pub mod handlers;

pub use handlers::{
    categories_handler, cors_middleware, departments_handler, fallback_handler, healthz_handler,
    landing_handler, list_products_handler, product_by_id_handler,
};
