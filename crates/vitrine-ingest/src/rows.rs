// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use vitrine_model::{
    Product, FALLBACK_BRAND, FALLBACK_CATEGORY, FALLBACK_DEPARTMENT, FALLBACK_NAME,
};

/// One input row as the delimited file presents it, before any validation.
/// Every field is optional: short or misaligned rows decode instead of
/// aborting the stream.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawRow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub cost: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub retail_price: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub distribution_center_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RowOutcome {
    Valid(Product),
    /// A duplicate header row embedded in the data (`id` field is the
    /// literal column name).
    HeaderRow,
    /// A required field is missing or empty; the row is skipped.
    MissingField(&'static str),
    /// The row normalized into something the store must never hold.
    Unrecoverable(&'static str),
}

pub(crate) fn process_row(raw: &RawRow) -> RowOutcome {
    if raw.id.as_deref() == Some("id") {
        return RowOutcome::HeaderRow;
    }

    for (field, value) in [
        ("id", &raw.id),
        ("name", &raw.name),
        ("category", &raw.category),
        ("brand", &raw.brand),
        ("department", &raw.department),
        ("sku", &raw.sku),
    ] {
        if value.as_deref().is_none_or(str::is_empty) {
            return RowOutcome::MissingField(field);
        }
    }

    let id = parse_int(&raw.id, 0);
    let distribution_center_id = parse_int(&raw.distribution_center_id, 1);
    let cost = parse_float(&raw.cost);
    let retail_price = parse_float(&raw.retail_price);

    let name = text_or(&raw.name, FALLBACK_NAME);
    let category = text_or(&raw.category, FALLBACK_CATEGORY);
    let brand = text_or(&raw.brand, FALLBACK_BRAND);
    let department = text_or(&raw.department, FALLBACK_DEPARTMENT);
    let sku = match raw.sku.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => synthesize_sku(),
    };

    if id <= 0 {
        return RowOutcome::Unrecoverable("id");
    }
    if name == FALLBACK_NAME {
        return RowOutcome::Unrecoverable("name");
    }

    RowOutcome::Valid(Product {
        id,
        name,
        cost,
        retail_price,
        category,
        brand,
        department,
        department_id: None,
        sku,
        distribution_center_id,
    })
}

fn parse_int(value: &Option<String>, default: i64) -> i64 {
    value
        .as_deref()
        .map(str::trim)
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
}

fn parse_float(value: &Option<String>) -> f64 {
    value
        .as_deref()
        .map(str::trim)
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn text_or(value: &Option<String>, fallback: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

static SKU_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Epoch milliseconds plus a process-unique counter. Strictly stronger
/// uniqueness than a random suffix within one import run.
fn synthesize_sku() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let serial = SKU_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("SKU-{millis}-{serial}")
}
