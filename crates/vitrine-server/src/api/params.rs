// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use vitrine_query::{ProductFilter, ProductQueryRequest};

/// A query-string parameter the client got wrong. Always a 400.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamError {
    pub parameter: &'static str,
    pub value: String,
}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid value for {}: {:?}", self.parameter, self.value)
    }
}
impl std::error::Error for ParamError {}

/// Parses `/api/products` query-string parameters into a query request.
///
/// Empty values are treated as absent. `page` and `limit` must be positive
/// integers, `limit` capped at `max_page_size`; `minPrice` and `maxPrice`
/// must be non-negative numbers. Unknown parameters are ignored.
pub fn parse_list_products_params(
    raw: &BTreeMap<String, String>,
    default_page_size: usize,
    max_page_size: usize,
) -> Result<ProductQueryRequest, ParamError> {
    let page = match present(raw, "page") {
        Some(value) => match value.parse::<u32>() {
            Ok(n) if n >= 1 => n,
            _ => {
                return Err(ParamError {
                    parameter: "page",
                    value: value.to_string(),
                })
            }
        },
        None => 1,
    };

    let page_size = match present(raw, "limit") {
        Some(value) => match value.parse::<usize>() {
            Ok(n) if n >= 1 && n <= max_page_size => n,
            _ => {
                return Err(ParamError {
                    parameter: "limit",
                    value: value.to_string(),
                })
            }
        },
        None => default_page_size,
    };

    let min_price = parse_price(raw, "minPrice")?;
    let max_price = parse_price(raw, "maxPrice")?;

    let filter = ProductFilter {
        category: present(raw, "category").map(str::to_string),
        brand: present(raw, "brand").map(str::to_string),
        department: present(raw, "department").map(str::to_string),
        keyword: present(raw, "keyword").map(str::to_string),
        min_price,
        max_price,
    };

    Ok(ProductQueryRequest {
        filter,
        page,
        page_size,
    })
}

fn present<'a>(raw: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    raw.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

fn parse_price(
    raw: &BTreeMap<String, String>,
    parameter: &'static str,
) -> Result<Option<f64>, ParamError> {
    match present(raw, parameter) {
        Some(value) => match value.parse::<f64>() {
            Ok(n) if n.is_finite() && n >= 0.0 => Ok(Some(n)),
            _ => Err(ParamError {
                parameter,
                value: value.to_string(),
            }),
        },
        None => Ok(None),
    }
}
