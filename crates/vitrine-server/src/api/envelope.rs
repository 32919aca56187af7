// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use vitrine_model::{Department, Product};
use vitrine_query::ProductPage;

/// Successful list response. `count` is the number of rows on this page,
/// `total` the number of rows matching the filter overall.
#[derive(Debug, Clone, Serialize)]
pub struct ProductListEnvelope {
    pub success: bool,
    pub count: usize,
    pub total: u64,
    pub page: u32,
    pub pages: u32,
    #[serde(rename = "pageSize")]
    pub page_size: usize,
    pub data: Vec<Product>,
}

impl ProductListEnvelope {
    #[must_use]
    pub fn from_page(page: ProductPage) -> Self {
        Self {
            success: true,
            count: page.rows.len(),
            total: page.total,
            page: page.page,
            pages: page.pages,
            page_size: page.page_size,
            data: page.rows,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductEnvelope {
    pub success: bool,
    pub data: Product,
}

impl ProductEnvelope {
    #[must_use]
    pub fn new(data: Product) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DepartmentListEnvelope {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Department>,
}

impl DepartmentListEnvelope {
    #[must_use]
    pub fn new(data: Vec<Department>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryListEnvelope {
    pub success: bool,
    pub count: usize,
    pub data: Vec<String>,
}

impl CategoryListEnvelope {
    #[must_use]
    pub fn new(data: Vec<String>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Uniform error body. `error` carries detail only in development;
/// `path` is set only by the route fallback.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorEnvelope {
    #[must_use]
    pub fn product_not_found() -> Self {
        Self {
            success: false,
            message: "Product not found".to_string(),
            error: None,
            path: None,
        }
    }

    #[must_use]
    pub fn route_not_found(path: &str) -> Self {
        Self {
            success: false,
            message: "Route not found".to_string(),
            error: None,
            path: Some(path.to_string()),
        }
    }

    #[must_use]
    pub fn internal(detail: Option<String>) -> Self {
        Self {
            success: false,
            message: "Something went wrong!".to_string(),
            error: detail,
            path: None,
        }
    }

    #[must_use]
    pub fn invalid_param(detail: String) -> Self {
        Self {
            success: false,
            message: detail,
            error: None,
            path: None,
        }
    }
}
