//! Integration tests for the export entry service

mod common;

use caravan::config::secret_string;
use caravan::core::export::{
    AzureBlobSinkSettings, DestinationOptions, ExportService, ExportSinkProvider,
    ExportSinkRegistry, ExportSourceProvider, ExportSourceRegistry, ExportSpecification,
    SourceOptions,
};
use caravan::core::sinks::AzureBlobSinkProvider;
use caravan::core::sources::IdentifierSourceProvider;
use caravan::domain::{CaravanError, DicomIdentifier, Partition};
use common::{
    InMemoryBlobContainer, InMemoryFileStore, InMemoryInstanceStore, InMemorySecretStore,
    RecordingOperationsClient, StaticContainerOpener,
};
use std::sync::Arc;
use url::Url;

struct Harness {
    service: ExportService,
    client: Arc<RecordingOperationsClient>,
    secrets: Arc<InMemorySecretStore>,
}

fn harness() -> Harness {
    let instances = Arc::new(InMemoryInstanceStore::new());
    let files = Arc::new(InMemoryFileStore::new());
    let container = Arc::new(InMemoryBlobContainer::new(
        "https://unit.blob.example.com/export",
    ));
    let opener = Arc::new(StaticContainerOpener::new(container));
    let secrets = Arc::new(InMemorySecretStore::new());
    let client = Arc::new(RecordingOperationsClient::new());

    let source_provider: Arc<dyn ExportSourceProvider> =
        Arc::new(IdentifierSourceProvider::new(instances, 100));
    let sink_provider: Arc<dyn ExportSinkProvider> = Arc::new(
        AzureBlobSinkProvider::new(files, opener)
            .with_secret_store(Arc::clone(&secrets) as Arc<_>),
    );

    let service = ExportService::new(
        Arc::new(ExportSourceRegistry::new([source_provider])),
        Arc::new(ExportSinkRegistry::new([sink_provider])),
        Arc::clone(&client) as Arc<_>,
    );

    Harness {
        service,
        client,
        secrets,
    }
}

fn valid_specification() -> ExportSpecification {
    ExportSpecification {
        source: SourceOptions::identifiers(vec![DicomIdentifier::for_study("1.2.3").unwrap()]),
        destination: DestinationOptions::AzureBlob(AzureBlobSinkSettings {
            connection_string: Some(secret_string("AccountName=unit;AccountKey=k")),
            blob_container_name: Some("export".to_string()),
            ..Default::default()
        }),
    }
}

#[tokio::test]
async fn start_export_hands_a_secured_specification_to_the_host() {
    let harness = harness();
    let specification = valid_specification();

    let reference = harness
        .service
        .start_export(&specification, &Partition::default())
        .await
        .unwrap();

    let calls = harness.client.calls();
    assert_eq!(calls.len(), 1);
    let (operation_id, started, partition) = &calls[0];

    assert_eq!(*operation_id, reference.id);
    assert_eq!(
        reference.href,
        Url::parse(&format!(
            "https://host.example.com/operations/{operation_id}"
        ))
        .unwrap()
    );
    assert_eq!(*partition, Partition::default());

    // The source passes through untouched; the destination is sanitized.
    assert_eq!(started.source, specification.source);
    let DestinationOptions::AzureBlob(settings) = &started.destination;
    assert!(settings.connection_string.is_none());
    assert!(settings.secret.is_some());

    // The caller's specification still carries its plaintext; securing built
    // a new value rather than mutating the input.
    let DestinationOptions::AzureBlob(original) = &specification.destination;
    assert!(original.connection_string.is_some());
    assert!(original.secret.is_none());
}

#[tokio::test]
async fn invalid_source_rejects_before_any_side_effect() {
    let harness = harness();
    let specification = ExportSpecification {
        source: SourceOptions::identifiers(vec![]),
        ..valid_specification()
    };

    let err = harness
        .service
        .start_export(&specification, &Partition::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CaravanError::Validation { ref field, .. } if field == "source.settings.values"));
    assert!(harness.client.calls().is_empty());
    assert!(!harness.secrets.contains(""));
}

#[tokio::test]
async fn invalid_destination_rejects_before_securing() {
    let harness = harness();
    let specification = ExportSpecification {
        destination: DestinationOptions::AzureBlob(AzureBlobSinkSettings::default()),
        ..valid_specification()
    };

    let err = harness
        .service
        .start_export(&specification, &Partition::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CaravanError::Validation { .. }));
    assert!(harness.client.calls().is_empty());
}

#[tokio::test]
async fn each_start_gets_a_distinct_operation_id() {
    let harness = harness();
    let specification = valid_specification();

    let first = harness
        .service
        .start_export(&specification, &Partition::default())
        .await
        .unwrap();
    let second = harness
        .service
        .start_export(&specification, &Partition::default())
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(harness.client.calls().len(), 2);
}
