//! Domain models and types for Caravan.
//!
//! This module contains the core domain types shared by every layer of the
//! export pipeline:
//!
//! - **Strongly-typed identifiers** ([`Uid`], [`DicomIdentifier`],
//!   [`VersionedInstanceIdentifier`])
//! - **Per-item outcomes** ([`ReadResult`]) and **batch accounting**
//!   ([`ExportProgress`])
//! - **Error types** ([`CaravanError`], [`ResolveError`]) and the
//!   [`Result`] alias
//! - **Partitions** and **operation handles**
//!
//! # Type safety
//!
//! Identifiers use enums and newtypes so the compiler enforces the domain
//! invariants: a series reference always carries its study UID, and a
//! versioned instance can only come from resolving a logical identifier
//! against the instance store.

pub mod errors;
pub mod identifiers;
pub mod operations;
pub mod partition;
pub mod result;
pub mod results;

// Re-export commonly used types for convenience
pub use errors::{CaravanError, ResolveError};
pub use identifiers::{DicomIdentifier, Uid, VersionedInstanceIdentifier};
pub use operations::{operation_name, OperationReference};
pub use partition::Partition;
pub use result::Result;
pub use results::{ExportProgress, ReadFailure, ReadResult};
