//! Export sinks
//!
//! A sink accepts copied items and reports per-item success. Every read
//! result goes through the sink, including resolution failures: the sink is
//! the single place that records failure details, so a failed resolution is
//! written to its error log rather than attempted against the destination.

pub mod blob;

use crate::domain::{ReadResult, Result};
use async_trait::async_trait;
use url::Url;

pub use blob::{AzureBlobExportSink, AzureBlobSinkProvider};

/// A destination that accepts copied items
#[async_trait]
pub trait ExportSink: Send {
    /// Copies one item, returning whether it succeeded
    ///
    /// A resolution failure is itself a copy failure: it is recorded in the
    /// sink's error log and `false` is returned without touching the
    /// destination.
    async fn copy(&mut self, result: &ReadResult) -> bool;

    /// Location of the sink's accumulated error log
    fn error_href(&self) -> Url;

    /// Flushes buffered error-log entries to the destination
    ///
    /// Called once at the end of each batch invocation, in place of async
    /// disposal.
    async fn flush(&mut self) -> Result<()>;
}

impl std::fmt::Debug for dyn ExportSink + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn ExportSink")
    }
}
