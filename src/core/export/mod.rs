//! Export pipeline core
//!
//! The options envelope and specification, the provider registries, the
//! synchronous entry service, and the batch activity the durable host
//! invokes repeatedly.

pub mod batch;
pub mod options;
pub mod registry;
pub mod service;

pub use batch::{BatchExporter, ExportBatchArguments};
pub use options::{
    AzureBlobSinkSettings, DestinationKind, DestinationOptions, ExportSpecification,
    IdentifierSourceSettings, SecretKey, SourceKind, SourceOptions,
};
pub use registry::{
    ExportSinkProvider, ExportSinkRegistry, ExportSourceProvider, ExportSourceRegistry,
};
pub use service::ExportService;
