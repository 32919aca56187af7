// SPDX-License-Identifier: Apache-2.0

//! Wire-level surface of the catalog API: response envelopes and query
//! string parsing. Nothing here touches the store.

pub mod envelope;
pub mod params;

pub use envelope::{
    CategoryListEnvelope, DepartmentListEnvelope, ErrorEnvelope, ProductEnvelope,
    ProductListEnvelope,
};
pub use params::{parse_list_products_params, ParamError};
