//! Read results and export progress
//!
//! A [`ReadResult`] is the outcome of resolving one logical item from a
//! source: either a concrete instance to copy, or the identifier that failed
//! to resolve together with its error. Results are ephemeral; they are
//! produced and consumed within a single batch invocation.

use crate::domain::errors::ResolveError;
use crate::domain::identifiers::{DicomIdentifier, VersionedInstanceIdentifier};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Outcome of resolving one logical item
///
/// Exactly one variant is populated by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResult {
    /// The identifier resolved to a concrete stored instance
    Resolved(VersionedInstanceIdentifier),

    /// The identifier resolved to zero stored instances
    Failed(ReadFailure),
}

impl ReadResult {
    /// Wraps a resolved instance
    pub fn resolved(identifier: VersionedInstanceIdentifier) -> Self {
        Self::Resolved(identifier)
    }

    /// Wraps a resolution failure
    pub fn failed(identifier: DicomIdentifier, error: ResolveError) -> Self {
        Self::Failed(ReadFailure { identifier, error })
    }

    /// Returns `true` for the resolved variant
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// The identifier that failed to resolve, with the kind-specific error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadFailure {
    pub identifier: DicomIdentifier,
    pub error: ResolveError,
}

/// Aggregated outcome of one export batch
///
/// Counts are additive across repeated merges so per-batch results can be
/// folded into a running total in any completion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportProgress {
    /// Number of items copied successfully
    pub succeeded: u64,

    /// Number of items that failed to resolve or copy
    pub failed: u64,
}

impl ExportProgress {
    /// Creates a progress value from explicit counts
    pub fn new(succeeded: u64, failed: u64) -> Self {
        Self { succeeded, failed }
    }

    /// Records one copied item
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// Records one failed item
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Folds another batch's counts into this one
    pub fn merge(&mut self, other: ExportProgress) {
        *self += other;
    }

    /// Total number of items accounted for
    pub fn total(&self) -> u64 {
        self.succeeded + self.failed
    }
}

impl Add for ExportProgress {
    type Output = ExportProgress;

    fn add(self, rhs: ExportProgress) -> Self::Output {
        ExportProgress::new(self.succeeded + rhs.succeeded, self.failed + rhs.failed)
    }
}

impl AddAssign for ExportProgress {
    fn add_assign(&mut self, rhs: ExportProgress) {
        self.succeeded += rhs.succeeded;
        self.failed += rhs.failed;
    }
}
