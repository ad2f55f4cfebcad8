//! Data partitions
//!
//! A partition is the tenant/isolation boundary under which identifiers are
//! resolved. Every export batch is scoped to exactly one partition.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A tenant/isolation boundary for stored records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partition {
    /// Storage-level partition key
    pub key: i32,

    /// Human-readable partition name
    pub name: String,
}

impl Partition {
    /// Creates a new partition
    pub fn new(key: i32, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
        }
    }
}

impl Default for Partition {
    fn default() -> Self {
        Self::new(1, "default")
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
