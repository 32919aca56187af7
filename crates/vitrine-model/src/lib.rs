// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Vitrine catalog model SSOT.

mod department;
mod product;

pub use department::Department;
pub use product::{
    parse_product_id, ParseError, Product, Sku, CSV_COLUMNS, FALLBACK_BRAND,
    FALLBACK_CATEGORY, FALLBACK_DEPARTMENT, FALLBACK_NAME, NAME_MAX_LEN, REQUIRED_COLUMNS,
    SKU_MAX_LEN,
};

pub const CRATE_NAME: &str = "vitrine-model";
