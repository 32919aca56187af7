// SPDX-License-Identifier: Apache-2.0

use crate::StoreError;
use rusqlite::{Connection, OptionalExtension, Row};
use vitrine_model::{Department, Product};

pub(crate) const PRODUCT_COLUMNS: &str = "id, name, cost, retail_price, category, brand, \
     department, department_id, sku, distribution_center_id";

pub(crate) fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        cost: row.get(2)?,
        retail_price: row.get(3)?,
        category: row.get(4)?,
        brand: row.get(5)?,
        department: row.get(6)?,
        department_id: row.get(7)?,
        sku: row.get(8)?,
        distribution_center_id: row.get(9)?,
    })
}

/// Natural-id lookup. `None` is the not-found signal, not an error.
pub fn product_by_id(conn: &Connection, id: i64) -> Result<Option<Product>, StoreError> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
    let product = conn
        .query_row(&sql, [id], |row| product_from_row(row))
        .optional()?;
    Ok(product)
}

pub fn product_by_sku(conn: &Connection, sku: &str) -> Result<Option<Product>, StoreError> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1");
    let product = conn
        .query_row(&sql, [sku], |row| product_from_row(row))
        .optional()?;
    Ok(product)
}

/// All departments, sorted by name.
pub fn list_departments(conn: &Connection) -> Result<Vec<Department>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, name FROM departments ORDER BY name ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(Department {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// The true distinct category set, not a first-page sample.
pub fn distinct_categories(conn: &Connection) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare("SELECT DISTINCT category FROM products ORDER BY category ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn product_count(conn: &Connection) -> Result<u64, StoreError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
    Ok(count as u64)
}

pub fn sample_products(conn: &Connection, limit: usize) -> Result<Vec<Product>, StoreError> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC LIMIT ?1");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([limit as i64], |row| product_from_row(row))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DimensionCount {
    pub value: String,
    pub count: u64,
}

pub fn category_distribution(
    conn: &Connection,
    limit: usize,
) -> Result<Vec<DimensionCount>, StoreError> {
    dimension_counts(
        conn,
        "SELECT category, COUNT(*) FROM products GROUP BY category ORDER BY COUNT(*) DESC LIMIT ?1",
        limit,
    )
}

pub fn department_distribution(
    conn: &Connection,
    limit: usize,
) -> Result<Vec<DimensionCount>, StoreError> {
    dimension_counts(
        conn,
        "SELECT department, COUNT(*) FROM products GROUP BY department ORDER BY COUNT(*) DESC LIMIT ?1",
        limit,
    )
}

fn dimension_counts(
    conn: &Connection,
    sql: &str,
    limit: usize,
) -> Result<Vec<DimensionCount>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([limit as i64], |row| {
        Ok(DimensionCount {
            value: row.get(0)?,
            count: row.get::<_, i64>(1)? as u64,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct QualityChecks {
    pub zero_id: u64,
    pub empty_name: u64,
    pub empty_sku: u64,
}

/// The data-quality checks the verification tooling reports: rows that
/// slipped past import validation would show up here.
pub fn quality_checks(conn: &Connection) -> Result<QualityChecks, StoreError> {
    let one = |sql: &str| -> Result<u64, StoreError> {
        let count: i64 = conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as u64)
    };
    Ok(QualityChecks {
        zero_id: one("SELECT COUNT(*) FROM products WHERE id <= 0")?,
        empty_name: one("SELECT COUNT(*) FROM products WHERE name = ''")?,
        empty_sku: one("SELECT COUNT(*) FROM products WHERE sku = ''")?,
    })
}
