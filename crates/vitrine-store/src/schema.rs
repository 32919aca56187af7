// SPDX-License-Identifier: Apache-2.0

use crate::StoreError;
use rusqlite::Connection;
use std::path::Path;

pub const SCHEMA_VERSION: i64 = 1;

/// Opens (or creates) a store file and ensures the schema is present.
///
/// The returned connection is the single owned handle to the store; callers
/// inject it into the query engine and the import pipeline, and release by
/// dropping it.
pub fn open_store(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    conn.execute_batch(
        "
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;
        PRAGMA foreign_keys=ON;
        PRAGMA temp_store=MEMORY;
        ",
    )?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Creates tables and secondary indexes if absent. Idempotent.
pub fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS products (
          id INTEGER PRIMARY KEY,
          name TEXT NOT NULL,
          name_normalized TEXT NOT NULL,
          cost REAL NOT NULL,
          retail_price REAL NOT NULL,
          category TEXT NOT NULL,
          category_normalized TEXT NOT NULL,
          brand TEXT NOT NULL,
          brand_normalized TEXT NOT NULL,
          department TEXT NOT NULL,
          department_normalized TEXT NOT NULL,
          department_id INTEGER REFERENCES departments(id),
          sku TEXT NOT NULL UNIQUE,
          distribution_center_id INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS departments (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          name TEXT NOT NULL UNIQUE
        );
        CREATE TABLE IF NOT EXISTS catalog_meta (
          k TEXT PRIMARY KEY,
          v TEXT NOT NULL
        ) WITHOUT ROWID;
        ",
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO catalog_meta (k, v) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;
    create_indexes(conn)?;
    Ok(())
}

/// Secondary indexes over the filterable dimensions. The `*_normalized`
/// columns hold Rust-lowercased text so matching stays case-insensitive
/// beyond ASCII; filters run against those.
pub(crate) fn create_indexes(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_products_category ON products(category_normalized);
        CREATE INDEX IF NOT EXISTS idx_products_brand ON products(brand_normalized);
        CREATE INDEX IF NOT EXISTS idx_products_department_id ON products(department_id);
        CREATE INDEX IF NOT EXISTS idx_products_retail_price ON products(retail_price);
        CREATE INDEX IF NOT EXISTS idx_products_name_normalized ON products(name_normalized);
        ",
    )?;
    Ok(())
}

pub(crate) fn drop_indexes(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        DROP INDEX IF EXISTS idx_products_category;
        DROP INDEX IF EXISTS idx_products_brand;
        DROP INDEX IF EXISTS idx_products_department_id;
        DROP INDEX IF EXISTS idx_products_retail_price;
        DROP INDEX IF EXISTS idx_products_name_normalized;
        ",
    )?;
    Ok(())
}
