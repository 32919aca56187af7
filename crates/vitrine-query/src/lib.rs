// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! The Vitrine query engine.
//!
//! Translates filter and page parameters into a store query and returns a
//! bounded page together with the exact matching total. Filters combine by
//! AND; `keyword` expands to an OR across name, category, brand, and
//! department using case-insensitive substring matching. A department name
//! that resolves to nothing yields an empty page, never an error.

use rusqlite::{params_from_iter, types::Value, Connection};
use serde::{Deserialize, Serialize};
use vitrine_model::Product;

pub const CRATE_NAME: &str = "vitrine-query";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub department: Option<String>,
    pub keyword: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductQueryRequest {
    pub filter: ProductFilter,
    /// 1-based page number.
    pub page: u32,
    pub page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryLimits {
    pub max_page_size: usize,
    pub max_term_len: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            max_page_size: 100,
            max_term_len: 128,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductPage {
    pub rows: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub pages: u32,
    pub page_size: usize,
}

#[derive(Debug)]
pub struct QueryError(pub String);

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for QueryError {}

const PRODUCT_COLUMNS: &str = "id, name, cost, retail_price, category, brand, \
     department, department_id, sku, distribution_center_id";

pub fn query_products(
    conn: &Connection,
    req: &ProductQueryRequest,
    limits: &QueryLimits,
) -> Result<ProductPage, QueryError> {
    validate_request(req, limits)?;

    let department_id = match &req.filter.department {
        Some(name) => match resolve_department(conn, name)? {
            Some(id) => Some(id),
            // "No results" is a valid outcome for an unknown department.
            None => return Ok(empty_page(req)),
        },
        None => None,
    };

    let (where_sql, params) = build_where(&req.filter, department_id);

    let count_sql = format!("SELECT COUNT(*) FROM products{where_sql}");
    let total: i64 = conn
        .query_row(&count_sql, params_from_iter(params.iter()), |row| {
            row.get(0)
        })
        .map_err(|e| QueryError(e.to_string()))?;
    let total = total as u64;
    let pages = total.div_ceil(req.page_size as u64) as u32;

    let mut fetch_params = params;
    fetch_params.push(Value::Integer(req.page_size as i64));
    fetch_params.push(Value::Integer(
        (req.page as i64 - 1) * req.page_size as i64,
    ));
    let fetch_sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM products{where_sql} \
         ORDER BY retail_price ASC, id ASC LIMIT ? OFFSET ?"
    );
    let mut stmt = conn
        .prepare(&fetch_sql)
        .map_err(|e| QueryError(e.to_string()))?;
    let mapped = stmt
        .query_map(params_from_iter(fetch_params.iter()), |row| {
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
        })
        .map_err(|e| QueryError(e.to_string()))?;
    let rows: Vec<Product> = mapped
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| QueryError(e.to_string()))?;

    Ok(ProductPage {
        rows,
        total,
        page: req.page,
        pages,
        page_size: req.page_size,
    })
}

fn empty_page(req: &ProductQueryRequest) -> ProductPage {
    ProductPage {
        rows: Vec::new(),
        total: 0,
        page: req.page,
        pages: 0,
        page_size: req.page_size,
    }
}

fn validate_request(req: &ProductQueryRequest, limits: &QueryLimits) -> Result<(), QueryError> {
    if req.page == 0 {
        return Err(QueryError("page must be at least 1".to_string()));
    }
    if req.page_size == 0 || req.page_size > limits.max_page_size {
        return Err(QueryError(format!(
            "page_size must be between 1 and {}",
            limits.max_page_size
        )));
    }
    for (name, term) in [
        ("category", &req.filter.category),
        ("brand", &req.filter.brand),
        ("department", &req.filter.department),
        ("keyword", &req.filter.keyword),
    ] {
        if let Some(value) = term {
            if value.len() > limits.max_term_len {
                return Err(QueryError(format!(
                    "{name} length exceeds {}",
                    limits.max_term_len
                )));
            }
        }
    }
    // An inverted price range is legal; it simply matches nothing.
    Ok(())
}

/// Exact case-insensitive department-name resolution through the lookup
/// table. `None` means the name is unknown. The comparison happens in Rust
/// because SQLite's NOCASE only folds ASCII; the table is small.
fn resolve_department(conn: &Connection, name: &str) -> Result<Option<i64>, QueryError> {
    let wanted = name.to_lowercase();
    let mut stmt = conn
        .prepare("SELECT id, name FROM departments")
        .map_err(|e| QueryError(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(|e| QueryError(e.to_string()))?;
    for row in rows {
        let (id, dept) = row.map_err(|e| QueryError(e.to_string()))?;
        if dept.to_lowercase() == wanted {
            return Ok(Some(id));
        }
    }
    Ok(None)
}

fn build_where(filter: &ProductFilter, department_id: Option<i64>) -> (String, Vec<Value>) {
    let mut where_parts: Vec<String> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(category) = &filter.category {
        where_parts.push("category_normalized LIKE ? ESCAPE '!'".to_string());
        params.push(Value::Text(contains_pattern(category)));
    }
    if let Some(brand) = &filter.brand {
        where_parts.push("brand_normalized LIKE ? ESCAPE '!'".to_string());
        params.push(Value::Text(contains_pattern(brand)));
    }
    if let Some(id) = department_id {
        where_parts.push("department_id = ?".to_string());
        params.push(Value::Integer(id));
    }
    if let Some(keyword) = &filter.keyword {
        where_parts.push(
            "(name_normalized LIKE ? ESCAPE '!' OR category_normalized LIKE ? ESCAPE '!' \
             OR brand_normalized LIKE ? ESCAPE '!' OR department_normalized LIKE ? ESCAPE '!')"
                .to_string(),
        );
        let pattern = contains_pattern(keyword);
        for _ in 0..4 {
            params.push(Value::Text(pattern.clone()));
        }
    }
    if let Some(min) = filter.min_price {
        where_parts.push("retail_price >= ?".to_string());
        params.push(Value::Real(min));
    }
    if let Some(max) = filter.max_price {
        where_parts.push("retail_price <= ?".to_string());
        params.push(Value::Real(max));
    }

    if where_parts.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", where_parts.join(" AND ")), params)
    }
}

/// Lowercased `%term%` pattern with LIKE metacharacters escaped. Terms are
/// folded with Rust's `to_lowercase`, matching how the `*_normalized`
/// columns are written, so the comparison is symmetric for non-ASCII text.
fn contains_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.to_lowercase().chars() {
        match c {
            '!' | '%' | '_' => {
                out.push('!');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push('%');
    out
}

/// Returns the SQLite query plan for a filter combination, for the
/// operations CLI.
pub fn explain_query_plan(
    conn: &Connection,
    req: &ProductQueryRequest,
    limits: &QueryLimits,
) -> Result<Vec<String>, QueryError> {
    validate_request(req, limits)?;
    let department_id = match &req.filter.department {
        Some(name) => resolve_department(conn, name)?,
        None => None,
    };
    let (where_sql, mut params) = build_where(&req.filter, department_id);
    params.push(Value::Integer(req.page_size as i64));
    params.push(Value::Integer((req.page as i64 - 1) * req.page_size as i64));
    let sql = format!(
        "EXPLAIN QUERY PLAN SELECT {PRODUCT_COLUMNS} FROM products{where_sql} \
         ORDER BY retail_price ASC, id ASC LIMIT ? OFFSET ?"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| QueryError(e.to_string()))?;
    let lines = stmt
        .query_map(params_from_iter(params.iter()), |row| {
            row.get::<_, String>(3)
        })
        .map_err(|e| QueryError(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| QueryError(e.to_string()))?;
    Ok(lines)
}
