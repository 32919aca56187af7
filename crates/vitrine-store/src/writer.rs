// SPDX-License-Identifier: Apache-2.0

use crate::schema::{create_indexes, drop_indexes};
use crate::StoreError;
use rusqlite::{params, Connection};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Bulk operations run in fixed-size chunks to bound peak memory and
/// transaction size.
pub const CHUNK_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceReport {
    pub inserted: usize,
    pub chunks: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub departments: usize,
    pub products_updated: usize,
    pub batches: usize,
}

/// Replaces the whole product collection with `products`.
///
/// An empty batch performs no deletion and returns a zero report: a failed
/// or empty import must never clear the store. Otherwise: delete everything,
/// insert in [`CHUNK_SIZE`] chunks (one transaction each, cumulative
/// progress logged), rebuild the department lookup inline, and recreate
/// secondary indexes last.
pub fn replace_all_products(
    conn: &mut Connection,
    products: &[vitrine_model::Product],
) -> Result<ReplaceReport, StoreError> {
    if products.is_empty() {
        return Ok(ReplaceReport {
            inserted: 0,
            chunks: 0,
        });
    }

    drop_indexes(conn)?;

    let tx = conn.transaction()?;
    tx.execute("DELETE FROM products", [])?;
    tx.execute("DELETE FROM departments", [])?;
    tx.commit()?;

    let names: BTreeSet<&str> = products.iter().map(|p| p.department.as_str()).collect();
    let dept_map = upsert_departments(conn, names.iter().copied())?;

    let total = products.len();
    let mut inserted = 0_usize;
    let mut chunks = 0_usize;
    for chunk in products.chunks(CHUNK_SIZE) {
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO products (
                   id, name, name_normalized, cost, retail_price,
                   category, category_normalized, brand, brand_normalized,
                   department, department_normalized, department_id,
                   sku, distribution_center_id
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            )?;
            for p in chunk {
                let department_id = dept_map.get(p.department.as_str()).copied();
                stmt.execute(params![
                    p.id,
                    p.name,
                    p.name.to_lowercase(),
                    p.cost,
                    p.retail_price,
                    p.category,
                    p.category.to_lowercase(),
                    p.brand,
                    p.brand.to_lowercase(),
                    p.department,
                    p.department.to_lowercase(),
                    department_id,
                    p.sku,
                    p.distribution_center_id,
                ])?;
            }
        }
        tx.commit()?;
        inserted += chunk.len();
        chunks += 1;
        info!(inserted, total, "inserted product chunk");
    }

    create_indexes(conn)?;

    Ok(ReplaceReport { inserted, chunks })
}

/// Idempotently inserts department names and returns the name-to-id map.
pub fn upsert_departments<'a, I>(
    conn: &Connection,
    names: I,
) -> Result<BTreeMap<String, i64>, StoreError>
where
    I: IntoIterator<Item = &'a str>,
{
    {
        let mut stmt = conn.prepare("INSERT OR IGNORE INTO departments (name) VALUES (?1)")?;
        for name in names {
            stmt.execute([name])?;
        }
    }
    let mut stmt = conn.prepare("SELECT name, id FROM departments")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
    let mut map = BTreeMap::new();
    for row in rows {
        let (name, id) = row?;
        map.insert(name, id);
    }
    Ok(map)
}

/// Normalizes free-text department names into referenced entities.
///
/// The free-text `department` column is left untouched as the preserved
/// original, which also makes re-running the migration safe: the name source
/// never degrades into identities.
pub fn migrate_departments(
    conn: &mut Connection,
    batch_size: usize,
) -> Result<MigrationReport, StoreError> {
    if batch_size == 0 {
        return Err(StoreError("batch_size must be positive".to_string()));
    }

    let names: Vec<String> = {
        let mut stmt = conn.prepare("SELECT DISTINCT department FROM products")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<Result<Vec<_>, _>>()?
    };
    info!(count = names.len(), "found distinct departments");

    let dept_map = upsert_departments(conn, names.iter().map(String::as_str))?;

    let ids: Vec<i64> = {
        let mut stmt = conn.prepare("SELECT id FROM products ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
        rows.collect::<Result<Vec<_>, _>>()?
    };
    let total = ids.len();
    info!(total, "updating product department references");

    let mut updated = 0_usize;
    let mut batches = 0_usize;
    for batch in ids.chunks(batch_size) {
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "UPDATE products
                 SET department_id = (SELECT id FROM departments WHERE name = products.department)
                 WHERE id = ?1",
            )?;
            for id in batch {
                stmt.execute([id])?;
            }
        }
        tx.commit()?;
        updated += batch.len();
        batches += 1;
        info!(processed = updated, total, "processed migration batch");
    }

    Ok(MigrationReport {
        departments: dept_map.len(),
        products_updated: updated,
        batches,
    })
}
