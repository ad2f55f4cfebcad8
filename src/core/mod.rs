//! Business logic for the export pipeline.
//!
//! - [`export`] - options envelope, registries, entry service, batch activity
//! - [`sources`] - the source contract and the identifier-list source
//! - [`sinks`] - the sink contract and the Azure Blob sink

pub mod export;
pub mod sinks;
pub mod sources;
