//! Durable operation handles
//!
//! The pipeline delegates long-running scheduling to an external operations
//! host. Once a job is started the handle returned here is opaque to the
//! pipeline; callers use it to poll status out of band.

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Handle to a started export operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationReference {
    /// Operation id assigned at start time
    pub id: Uuid,

    /// Location where the operation's status can be queried
    pub href: Url,
}

impl OperationReference {
    /// Creates a new operation reference
    pub fn new(id: Uuid, href: Url) -> Self {
        Self { id, href }
    }
}

/// Formats an operation id the way external stores key it: 32 lowercase hex
/// digits without dashes.
pub fn operation_name(id: Uuid) -> String {
    id.simple().to_string()
}
