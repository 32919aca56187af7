// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// A normalized department. Created lazily from the distinct free-text
/// department names present on products; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

impl Department {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
