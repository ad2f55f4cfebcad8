//! Integration tests for the identifier export source

mod common;

use caravan::core::export::{ExportSourceProvider, SourceOptions};
use caravan::core::sources::{ExportSource, IdentifierExportSource, ReadFailureObserver};
use caravan::domain::{DicomIdentifier, Partition, ReadResult, ResolveError};
use common::InMemoryInstanceStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn source_with(
    store: Arc<InMemoryInstanceStore>,
    identifiers: Vec<DicomIdentifier>,
) -> IdentifierExportSource {
    IdentifierExportSource::new(store, Partition::default(), identifiers)
}

fn spec_identifiers() -> Vec<DicomIdentifier> {
    vec![
        DicomIdentifier::for_study("1").unwrap(),
        DicomIdentifier::for_series("7", "8").unwrap(),
        DicomIdentifier::for_instance("9", "1.0", "1.1").unwrap(),
    ]
}

struct CountingObserver {
    count: AtomicUsize,
}

impl CountingObserver {
    fn new() -> Self {
        Self {
            count: AtomicUsize::new(0),
        }
    }
}

impl ReadFailureObserver for CountingObserver {
    fn on_read_failure(&self, _identifier: &DicomIdentifier, _error: &ResolveError) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn dequeue_batches_preserve_order_and_bound() {
    let store = Arc::new(InMemoryInstanceStore::new());
    let identifiers: Vec<DicomIdentifier> = (0..7)
        .map(|i| DicomIdentifier::for_study(format!("1.{i}")).unwrap())
        .collect();
    let mut source = source_with(store, identifiers.clone());

    let mut drained = Vec::new();
    let mut batch_sizes = Vec::new();
    while let Some(SourceOptions::Identifiers(settings)) = source.try_dequeue_batch(3) {
        batch_sizes.push(settings.values.len());
        drained.extend(settings.values);
    }

    assert_eq!(drained, identifiers);
    assert_eq!(batch_sizes, vec![3, 3, 1]);
    assert!(source.try_dequeue_batch(3).is_none());
    assert!(source.description().is_none());
}

#[test]
fn dequeue_scenario_from_mixed_granularities() {
    let store = Arc::new(InMemoryInstanceStore::new());
    let mut source = source_with(store, spec_identifiers());

    let Some(SourceOptions::Identifiers(first)) = source.try_dequeue_batch(2) else {
        panic!("expected a first batch");
    };
    assert_eq!(
        first.values,
        vec![
            DicomIdentifier::for_study("1").unwrap(),
            DicomIdentifier::for_series("7", "8").unwrap(),
        ]
    );

    let Some(SourceOptions::Identifiers(second)) = source.try_dequeue_batch(2) else {
        panic!("expected a second batch");
    };
    assert_eq!(
        second.values,
        vec![DicomIdentifier::for_instance("9", "1.0", "1.1").unwrap()]
    );

    assert!(source.try_dequeue_batch(2).is_none());
}

#[test]
fn description_reflects_remaining_identifiers() {
    let store = Arc::new(InMemoryInstanceStore::new());
    let mut source = source_with(store, spec_identifiers());

    let Some(SourceOptions::Identifiers(described)) = source.description() else {
        panic!("expected a description");
    };
    assert_eq!(described.values.len(), 3);

    source.try_dequeue_batch(2);
    let Some(SourceOptions::Identifiers(remaining)) = source.description() else {
        panic!("expected a description");
    };
    assert_eq!(
        remaining.values,
        vec![DicomIdentifier::for_instance("9", "1.0", "1.1").unwrap()]
    );
}

#[tokio::test]
async fn enumeration_expands_in_supplied_and_store_order() {
    let store = Arc::new(InMemoryInstanceStore::new());
    store.insert(1, "1", "2", "3", 100);
    store.insert(1, "1", "2", "4", 101);
    store.insert(1, "9", "1.0", "1.1", 102);

    let mut source = source_with(
        Arc::clone(&store),
        vec![
            DicomIdentifier::for_study("1").unwrap(),
            DicomIdentifier::for_instance("9", "1.0", "1.1").unwrap(),
        ],
    );

    let mut versions = Vec::new();
    while let Some(result) = source.read_next().await.unwrap() {
        match result {
            ReadResult::Resolved(identifier) => versions.push(identifier.version),
            ReadResult::Failed(failure) => panic!("unexpected failure: {failure:?}"),
        }
    }
    assert_eq!(versions, vec![100, 101, 102]);

    // One-shot enumeration: the source stays exhausted.
    assert!(source.read_next().await.unwrap().is_none());
}

#[tokio::test]
async fn unresolved_series_yields_one_failure_and_one_notification() {
    let store = Arc::new(InMemoryInstanceStore::new());
    store.insert(1, "9", "1.0", "1.1", 102);

    let mut source = source_with(Arc::clone(&store), spec_identifiers());
    let observer = Arc::new(CountingObserver::new());
    source.set_read_failure_observer(observer.clone());

    let mut results = Vec::new();
    while let Some(result) = source.read_next().await.unwrap() {
        results.push(result);
    }

    // Study "1" and series "7/8" are absent; each yields exactly one failure.
    let failures: Vec<_> = results
        .iter()
        .filter_map(|result| match result {
            ReadResult::Failed(failure) => Some(failure.clone()),
            ReadResult::Resolved(_) => None,
        })
        .collect();
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].error, ResolveError::StudyNotFound);
    assert_eq!(failures[1].error, ResolveError::SeriesNotFound);
    assert_eq!(
        failures[1].identifier,
        DicomIdentifier::for_series("7", "8").unwrap()
    );
    assert_eq!(observer.count.load(Ordering::SeqCst), 2);

    // The resolved instance still arrives, in supplied order, last.
    assert!(matches!(results[2], ReadResult::Resolved(_)));
}

#[tokio::test]
async fn partition_scopes_resolution() {
    let store = Arc::new(InMemoryInstanceStore::new());
    store.insert(2, "1", "2", "3", 100);

    let mut source = IdentifierExportSource::new(
        store,
        Partition::new(1, "default"),
        vec![DicomIdentifier::for_study("1").unwrap()],
    );

    let result = source.read_next().await.unwrap().unwrap();
    assert!(matches!(result, ReadResult::Failed(_)));
}

#[tokio::test]
async fn provider_validates_before_creating() {
    let store = Arc::new(InMemoryInstanceStore::new());
    let provider = caravan::core::sources::IdentifierSourceProvider::new(store, 2);

    let empty = SourceOptions::identifiers(vec![]);
    assert!(provider.validate(&empty).is_err());

    let too_many = SourceOptions::identifiers(vec![
        DicomIdentifier::for_study("1").unwrap(),
        DicomIdentifier::for_study("2").unwrap(),
        DicomIdentifier::for_study("3").unwrap(),
    ]);
    assert!(provider.validate(&too_many).is_err());

    let ok = SourceOptions::identifiers(vec![DicomIdentifier::for_study("1").unwrap()]);
    assert!(provider.validate(&ok).is_ok());
    assert!(provider.create(&ok, &Partition::default()).await.is_ok());
}
