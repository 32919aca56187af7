// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! The Vitrine record store.
//!
//! Owns the SQLite schema and every write path. Products enter the store
//! only through [`replace_all_products`] (full-collection replace); the API
//! layer reads through the lookup functions in [`reader`].

mod reader;
mod schema;
mod writer;

use std::fmt::{Display, Formatter};

pub use reader::{
    category_distribution, department_distribution, distinct_categories, list_departments,
    product_by_id, product_by_sku, product_count, quality_checks, sample_products,
    DimensionCount, QualityChecks,
};
pub use schema::{create_schema, open_store, SCHEMA_VERSION};
pub use writer::{
    migrate_departments, replace_all_products, upsert_departments, MigrationReport, ReplaceReport,
    CHUNK_SIZE,
};

pub const CRATE_NAME: &str = "vitrine-store";

#[derive(Debug)]
pub struct StoreError(pub String);

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self(e.to_string())
    }
}
