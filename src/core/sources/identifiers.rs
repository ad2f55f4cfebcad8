//! Identifier-list export source
//!
//! Resolves a caller-supplied, ordered list of study/series/instance
//! references into concrete storage locations via the instance store, and
//! supports draining that same list into fixed-size sub-batches for the
//! external scheduler.

use crate::adapters::traits::InstanceStore;
use crate::core::export::options::{SourceKind, SourceOptions};
use crate::core::sources::{ExportSource, ReadFailureObserver};
use crate::domain::{
    CaravanError, DicomIdentifier, Partition, ReadResult, Result, VersionedInstanceIdentifier,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;

/// Export source backed by an explicit identifier list
///
/// The identifier queue is fixed at construction; nothing can be added later.
/// Enumeration walks the queue with a cursor and never rewinds, so reading is
/// a one-shot traversal. Dequeueing batches removes identifiers from the
/// front, which is what fans a large request out into bounded units of work.
pub struct IdentifierExportSource {
    instance_store: Arc<dyn InstanceStore>,
    partition: Partition,
    identifiers: VecDeque<DicomIdentifier>,
    cursor: usize,
    pending: VecDeque<VersionedInstanceIdentifier>,
    observer: Option<Arc<dyn ReadFailureObserver>>,
}

impl IdentifierExportSource {
    /// Creates a source over an ordered identifier list, scoped to a partition
    pub fn new(
        instance_store: Arc<dyn InstanceStore>,
        partition: Partition,
        identifiers: Vec<DicomIdentifier>,
    ) -> Self {
        Self {
            instance_store,
            partition,
            identifiers: identifiers.into(),
            cursor: 0,
            pending: VecDeque::new(),
            observer: None,
        }
    }

    async fn resolve(
        &self,
        identifier: &DicomIdentifier,
    ) -> Result<Vec<VersionedInstanceIdentifier>> {
        let partition_key = self.partition.key;
        match identifier {
            DicomIdentifier::Study { study_instance_uid } => {
                self.instance_store
                    .instances_in_study(partition_key, study_instance_uid)
                    .await
            }
            DicomIdentifier::Series {
                study_instance_uid,
                series_instance_uid,
            } => {
                self.instance_store
                    .instances_in_series(partition_key, study_instance_uid, series_instance_uid)
                    .await
            }
            DicomIdentifier::Instance {
                study_instance_uid,
                series_instance_uid,
                sop_instance_uid,
            } => {
                self.instance_store
                    .instance(
                        partition_key,
                        study_instance_uid,
                        series_instance_uid,
                        sop_instance_uid,
                    )
                    .await
            }
        }
    }
}

#[async_trait]
impl ExportSource for IdentifierExportSource {
    async fn read_next(&mut self) -> Result<Option<ReadResult>> {
        loop {
            // Multi-instance expansions drain in store order before the next
            // identifier is touched.
            if let Some(instance) = self.pending.pop_front() {
                return Ok(Some(ReadResult::resolved(instance)));
            }

            let Some(identifier) = self.identifiers.get(self.cursor).cloned() else {
                return Ok(None);
            };
            self.cursor += 1;

            let instances = self.resolve(&identifier).await?;
            if instances.is_empty() {
                let error = identifier.resolve_error();
                if let Some(observer) = &self.observer {
                    observer.on_read_failure(&identifier, &error);
                }
                return Ok(Some(ReadResult::failed(identifier, error)));
            }
            self.pending.extend(instances);
        }
    }

    fn try_dequeue_batch(&mut self, size: usize) -> Option<SourceOptions> {
        if size == 0 || self.identifiers.is_empty() {
            return None;
        }

        let count = size.min(self.identifiers.len());
        let values: Vec<DicomIdentifier> = self.identifiers.drain(..count).collect();
        // Keep the read cursor pointing at the same identifier it did before
        // the front of the queue moved.
        self.cursor = self.cursor.saturating_sub(count);
        Some(SourceOptions::identifiers(values))
    }

    fn description(&self) -> Option<SourceOptions> {
        if self.identifiers.is_empty() {
            None
        } else {
            Some(SourceOptions::identifiers(
                self.identifiers.iter().cloned().collect(),
            ))
        }
    }

    fn set_read_failure_observer(&mut self, observer: Arc<dyn ReadFailureObserver>) {
        self.observer = Some(observer);
    }
}

/// Provider for [`IdentifierExportSource`]
///
/// Stateless beyond its injected instance store and the request limit taken
/// from configuration.
pub struct IdentifierSourceProvider {
    instance_store: Arc<dyn InstanceStore>,
    max_identifiers: usize,
}

impl IdentifierSourceProvider {
    /// Creates the provider
    pub fn new(instance_store: Arc<dyn InstanceStore>, max_identifiers: usize) -> Self {
        Self {
            instance_store,
            max_identifiers,
        }
    }
}

#[async_trait]
impl crate::core::export::registry::ExportSourceProvider for IdentifierSourceProvider {
    fn kind(&self) -> SourceKind {
        SourceKind::Identifiers
    }

    fn validate(&self, options: &SourceOptions) -> Result<()> {
        let SourceOptions::Identifiers(settings) = options;
        settings.validate(self.max_identifiers)
    }

    async fn create(
        &self,
        options: &SourceOptions,
        partition: &Partition,
    ) -> Result<Box<dyn ExportSource>> {
        let SourceOptions::Identifiers(settings) = options;
        if settings.values.is_empty() {
            return Err(CaravanError::Configuration(
                "cannot create an identifier source without identifiers".to_string(),
            ));
        }
        Ok(Box::new(IdentifierExportSource::new(
            Arc::clone(&self.instance_store),
            partition.clone(),
            settings.values.clone(),
        )))
    }
}
