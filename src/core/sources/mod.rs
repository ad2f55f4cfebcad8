//! Export sources
//!
//! A source produces the items to export. Enumeration is a one-shot, ordered
//! traversal yielding one [`ReadResult`] at a time; the same source can
//! instead be drained into bounded sub-batches for distributed processing.

pub mod identifiers;

use crate::core::export::options::SourceOptions;
use crate::domain::{DicomIdentifier, ReadResult, ResolveError, Result};
use async_trait::async_trait;
use std::sync::Arc;

pub use identifiers::{IdentifierExportSource, IdentifierSourceProvider};

/// Optional side channel notified once per unresolved identifier
///
/// The failure itself is always carried in the failed [`ReadResult`]; an
/// observer exists only for callers that additionally want side-channel
/// logging during enumeration.
pub trait ReadFailureObserver: Send + Sync {
    fn on_read_failure(&self, identifier: &DicomIdentifier, error: &ResolveError);
}

/// A provider of items to export
///
/// Implementations own a fixed set of work decided at construction time.
/// Enumeration and batch dequeueing both consume shared internal state, so
/// the methods take `&mut self`; a source instance must not be shared across
/// concurrent invocations.
#[async_trait]
pub trait ExportSource: Send {
    /// Yields the next read result, or `None` when the source is exhausted
    ///
    /// Results are emitted in the order work was supplied. Enumeration is not
    /// restartable. Not-found identifiers are reported as failed results;
    /// only infrastructure errors surface as `Err`.
    async fn read_next(&mut self) -> Result<Option<ReadResult>>;

    /// Atomically removes up to `size` items from the front of the remaining
    /// work and re-describes them as a new source of the same kind
    ///
    /// Returns `None` once no work remains (or for a zero `size`).
    fn try_dequeue_batch(&mut self, size: usize) -> Option<SourceOptions>;

    /// Describes the work this source still holds, for progress reporting
    ///
    /// `None` exactly when the source holds no identifiers.
    fn description(&self) -> Option<SourceOptions>;

    /// Registers the optional read-failure observer
    fn set_read_failure_observer(&mut self, observer: Arc<dyn ReadFailureObserver>);
}
