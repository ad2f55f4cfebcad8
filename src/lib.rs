// Caravan - DICOM Archive Export Pipeline
// Copyright (c) 2025 Caravan Contributors
// Licensed under the MIT License

//! # Caravan - Resumable bulk export for DICOM imaging archives
//!
//! Caravan moves a caller-specified set of stored imaging records from an
//! internal archive to an external destination as a long-running, resumable,
//! partially-failable bulk operation. Sources (how records are selected) and
//! sinks (where they go) are pluggable and know nothing about each other.
//!
//! ## Architecture
//!
//! Caravan follows a layered architecture:
//!
//! - [`core`] - Business logic (options envelope, registries, export
//!   service, batch activity, sources, sinks)
//! - [`adapters`] - Contracts for external collaborators (instance store,
//!   file store, destination containers, secret vault, operation host)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## How an export runs
//!
//! A caller submits an [`core::export::ExportSpecification`] to the
//! [`core::export::ExportService`], which validates both sides, moves the
//! destination's credentials into the secret vault, and hands the sanitized
//! specification to the durable operation host. The host then repeatedly
//! invokes the [`core::export::BatchExporter`] with sub-batches drained from
//! the source; each invocation copies its items through the sink and returns
//! an additive [`domain::ExportProgress`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use caravan::core::export::{
//!     ExportService, ExportSinkRegistry, ExportSourceRegistry, ExportSpecification,
//! };
//! use caravan::domain::Partition;
//!
//! # async fn example(
//! #     sources: Arc<ExportSourceRegistry>,
//! #     sinks: Arc<ExportSinkRegistry>,
//! #     client: Arc<dyn caravan::adapters::OperationsClient>,
//! #     specification: ExportSpecification,
//! # ) -> caravan::domain::Result<()> {
//! let service = ExportService::new(sources, sinks, client);
//! let operation = service.start_export(&specification, &Partition::default()).await?;
//! println!("started export {}", operation.id);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error handling
//!
//! All fallible operations return [`domain::Result`], with
//! [`domain::CaravanError`] spanning the export error taxonomy: validation
//! errors reject a request before an operation exists, not-found errors are
//! counted per item without aborting a batch, and configuration errors abort
//! a batch invocation for the host to surface.
//!
//! ## Logging
//!
//! Caravan uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(operation_id = "4ae7...", "Starting export operation");
//! warn!(identifier = "1.2.3/4.5", "Failed to resolve identifier");
//! ```

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
