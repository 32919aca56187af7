// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const NAME_MAX_LEN: usize = 256;
pub const SKU_MAX_LEN: usize = 64;

/// Row defaults applied by the import pipeline when a field survives the
/// required-field check but trims down to nothing.
pub const FALLBACK_NAME: &str = "Unnamed Product";
pub const FALLBACK_CATEGORY: &str = "Uncategorized";
pub const FALLBACK_BRAND: &str = "Unbranded";
pub const FALLBACK_DEPARTMENT: &str = "General";

/// Header of the delimited input file, in source column order.
pub const CSV_COLUMNS: [&str; 9] = [
    "id",
    "cost",
    "category",
    "name",
    "brand",
    "retail_price",
    "department",
    "sku",
    "distribution_center_id",
];

/// Columns that must be present and non-empty for a row to enter the batch.
pub const REQUIRED_COLUMNS: [&str; 6] = ["id", "name", "category", "brand", "department", "sku"];

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    Trimmed(&'static str),
    TooLong(&'static str, usize),
    NonPositive(&'static str, i64),
    Negative(&'static str, f64),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::Trimmed(name) => {
                write!(f, "{name} must not contain leading/trailing whitespace")
            }
            Self::TooLong(name, max) => write!(f, "{name} exceeds max length {max}"),
            Self::NonPositive(name, value) => {
                write!(f, "{name} must be a positive integer, got {value}")
            }
            Self::Negative(name, value) => {
                write!(f, "{name} must not be negative, got {value}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// A stock-keeping unit. Unique across the collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct Sku(String);

impl Sku {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("sku"));
        }
        if input.trim() != input {
            return Err(ParseError::Trimmed("sku"));
        }
        if input.len() > SKU_MAX_LEN {
            return Err(ParseError::TooLong("sku", SKU_MAX_LEN));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Sku {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates the natural product identity: a positive integer.
pub fn parse_product_id(input: i64) -> Result<i64, ParseError> {
    if input <= 0 {
        return Err(ParseError::NonPositive("id", input));
    }
    Ok(input)
}

/// A catalog product as stored and served.
///
/// `department` carries the original free-text name; `department_id` is the
/// normalized reference maintained by the import pipeline and the department
/// migration. The text column is authoritative for display and audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub cost: f64,
    pub retail_price: f64,
    pub category: String,
    pub brand: String,
    pub department: String,
    pub department_id: Option<i64>,
    pub sku: String,
    pub distribution_center_id: i64,
}

impl Product {
    /// Checks the invariants a record must satisfy before it may enter the
    /// store. Uniqueness of `id`/`sku` is collection-level and enforced by
    /// the store schema, not here.
    pub fn validate(&self) -> Result<(), ParseError> {
        parse_product_id(self.id)?;
        if self.name.is_empty() {
            return Err(ParseError::Empty("name"));
        }
        if self.name.len() > NAME_MAX_LEN {
            return Err(ParseError::TooLong("name", NAME_MAX_LEN));
        }
        if self.cost < 0.0 {
            return Err(ParseError::Negative("cost", self.cost));
        }
        if self.retail_price < 0.0 {
            return Err(ParseError::Negative("retail_price", self.retail_price));
        }
        Sku::parse(&self.sku)?;
        Ok(())
    }
}
