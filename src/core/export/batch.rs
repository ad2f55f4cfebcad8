//! Batch export activity
//!
//! The repeatable unit of work the durable host invokes. Each invocation is
//! a pure function of its arguments plus the external stores: it creates its
//! own source and sink, streams every read result through the sink, and
//! returns the aggregated counts. Nothing survives the call, so the host can
//! safely re-invoke it against the same logical batch; folding a batch's
//! result into the running total without double-counting is the host's
//! responsibility.

use crate::core::export::options::{DestinationOptions, SourceOptions};
use crate::core::export::registry::{ExportSinkRegistry, ExportSourceRegistry};
use crate::core::sources::ReadFailureObserver;
use crate::domain::{DicomIdentifier, ExportProgress, Partition, ResolveError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

/// Input of one batch activity invocation, persisted by the durable host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBatchArguments {
    /// The sub-batch of work drawn from the original source
    pub source: SourceOptions,

    /// The (secured) destination description
    pub destination: DestinationOptions,

    /// Partition under which identifiers are resolved
    pub partition: Partition,
}

/// Logs unresolved identifiers as they are encountered
struct LogReadFailures;

impl ReadFailureObserver for LogReadFailures {
    fn on_read_failure(&self, identifier: &DicomIdentifier, error: &ResolveError) {
        warn!(identifier = %identifier, error = %error, "Failed to resolve identifier");
    }
}

/// Executes batch activities on behalf of the durable host
pub struct BatchExporter {
    sources: Arc<ExportSourceRegistry>,
    sinks: Arc<ExportSinkRegistry>,
}

impl BatchExporter {
    /// Creates the exporter from the startup registries
    pub fn new(sources: Arc<ExportSourceRegistry>, sinks: Arc<ExportSinkRegistry>) -> Self {
        Self { sources, sinks }
    }

    /// Copies one batch of items from source to sink
    ///
    /// Every read result, success or resolution failure, goes through the
    /// sink; the sink decides whether to attempt the destination or record
    /// an error-log entry. The source is drained strictly sequentially, and
    /// `succeeded + failed` always equals the number of results it emitted.
    pub async fn export_batch(
        &self,
        operation_id: Uuid,
        arguments: &ExportBatchArguments,
    ) -> Result<ExportProgress> {
        let mut sink = self
            .sinks
            .create(&arguments.destination, operation_id)
            .await?;
        let mut source = self
            .sources
            .create(&arguments.source, &arguments.partition)
            .await?;
        source.set_read_failure_observer(Arc::new(LogReadFailures));

        let mut progress = ExportProgress::default();
        while let Some(result) = source.read_next().await? {
            if sink.copy(&result).await {
                progress.record_success();
            } else {
                progress.record_failure();
            }
        }

        sink.flush().await?;

        info!(
            operation_id = %operation_id,
            succeeded = progress.succeeded,
            failed = progress.failed,
            "Completed export batch"
        );
        Ok(progress)
    }

    /// Returns the error-log location for a destination
    ///
    /// Builds a fresh sink from the same destination description, for
    /// callers that want failure details after the job ends.
    pub async fn get_error_href(
        &self,
        operation_id: Uuid,
        destination: &DestinationOptions,
    ) -> Result<Url> {
        let sink = self.sinks.create(destination, operation_id).await?;
        Ok(sink.error_href())
    }

    /// Runs the destination's terminal-state cleanup
    ///
    /// Invoked once the operation succeeds or fails permanently; deletes the
    /// vaulted secret created when the specification was secured.
    pub async fn complete_export(&self, destination: &DestinationOptions) -> Result<()> {
        self.sinks.complete_copy(destination).await
    }
}
