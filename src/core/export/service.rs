//! Export entry service
//!
//! The synchronous front door of the pipeline: validates both sides of a
//! specification, secures destination secrets, and hands the sanitized
//! specification to the external operation client to begin the durable job.

use crate::adapters::traits::OperationsClient;
use crate::core::export::options::ExportSpecification;
use crate::core::export::registry::{ExportSinkRegistry, ExportSourceRegistry};
use crate::domain::{OperationReference, Partition, Result};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Starts export operations
pub struct ExportService {
    sources: Arc<ExportSourceRegistry>,
    sinks: Arc<ExportSinkRegistry>,
    client: Arc<dyn OperationsClient>,
}

impl ExportService {
    /// Creates the service from the startup registries and operation client
    pub fn new(
        sources: Arc<ExportSourceRegistry>,
        sinks: Arc<ExportSinkRegistry>,
        client: Arc<dyn OperationsClient>,
    ) -> Self {
        Self {
            sources,
            sinks,
            client,
        }
    }

    /// Validates a specification, secures its destination, and starts the
    /// durable export job under the caller's partition
    ///
    /// The input specification is never mutated; the operation client
    /// receives a new value whose destination has been sanitized. Validation
    /// fails fast on the first violation, before any operation is created.
    pub async fn start_export(
        &self,
        specification: &ExportSpecification,
        partition: &Partition,
    ) -> Result<OperationReference> {
        let operation_id = Uuid::new_v4();

        self.sources.validate(&specification.source)?;
        self.sinks.validate(&specification.destination)?;

        let specification = ExportSpecification {
            source: specification.source.clone(),
            destination: self
                .sinks
                .secure(specification.destination.clone(), operation_id)
                .await?,
        };

        info!(
            operation_id = %operation_id,
            partition = %partition,
            source_kind = %specification.source.kind(),
            destination_kind = %specification.destination.kind(),
            "Starting export operation"
        );

        self.client
            .start_export(operation_id, &specification, partition)
            .await
    }
}
