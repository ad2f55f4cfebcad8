//! Azure Blob export sink and its secret-securing provider
//!
//! The provider keeps long-lived destination credentials out of persisted
//! operation state: before a specification is handed to the durable host,
//! the credential-bearing fields are serialized into the secret vault and
//! replaced with a vault reference; when a batch runs, the reference is
//! resolved back into plaintext on an in-memory copy only; when the
//! operation reaches a terminal state, the vault entry is deleted.

use crate::adapters::traits::{BlobContainer, BlobContainerOpener, FileStore, SecretStore};
use crate::core::export::options::{
    AzureBlobSinkSettings, DestinationKind, DestinationOptions, SecretKey,
};
use crate::core::export::registry::ExportSinkProvider;
use crate::core::sinks::ExportSink;
use crate::config::SecretString;
use crate::domain::{operation_name, CaravanError, ReadResult, Result, VersionedInstanceIdentifier};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

/// Serialized credential payload stored in the vault
///
/// The field names and casing are the contract between securing and
/// retrieval and must round-trip exactly.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BlobSecrets {
    connection_string: Option<SecretString>,
    blob_container_uri: Option<Url>,
}

/// Sink provider for Azure Blob destinations
///
/// The secret store is optional: without one the pipeline still functions,
/// but destination credentials stay in the persisted specification and a
/// warning is logged.
pub struct AzureBlobSinkProvider {
    file_store: Arc<dyn FileStore>,
    containers: Arc<dyn BlobContainerOpener>,
    secret_store: Option<Arc<dyn SecretStore>>,
}

impl AzureBlobSinkProvider {
    /// Creates a provider without a secret store
    pub fn new(file_store: Arc<dyn FileStore>, containers: Arc<dyn BlobContainerOpener>) -> Self {
        Self {
            file_store,
            containers,
            secret_store: None,
        }
    }

    /// Attaches a secret store for the secure/retrieve/delete workflow
    pub fn with_secret_store(mut self, secret_store: Arc<dyn SecretStore>) -> Self {
        self.secret_store = Some(secret_store);
        self
    }

    /// Reconstitutes plaintext credentials on an in-memory copy
    ///
    /// The returned settings are never persisted; `secret` is cleared so the
    /// copy describes a plaintext destination.
    async fn retrieve(&self, settings: &AzureBlobSinkSettings) -> Result<AzureBlobSinkSettings> {
        let mut settings = settings.clone();
        let Some(secret) = settings.secret.take() else {
            return Ok(settings);
        };

        let Some(store) = &self.secret_store else {
            return Err(CaravanError::Configuration(
                "the destination references a secret but no secret store is registered".to_string(),
            ));
        };

        let json = store.get_secret(&secret.name, &secret.version).await?;
        let secrets: BlobSecrets = serde_json::from_str(&json)?;
        settings.connection_string = secrets.connection_string;
        settings.blob_container_uri = secrets.blob_container_uri;
        Ok(settings)
    }
}

#[async_trait]
impl ExportSinkProvider for AzureBlobSinkProvider {
    fn kind(&self) -> DestinationKind {
        DestinationKind::AzureBlob
    }

    fn validate(&self, options: &DestinationOptions) -> Result<()> {
        let DestinationOptions::AzureBlob(settings) = options;
        settings.validate()
    }

    async fn secure(
        &self,
        options: DestinationOptions,
        operation_id: Uuid,
    ) -> Result<DestinationOptions> {
        let DestinationOptions::AzureBlob(mut settings) = options;

        // Re-securing an already-secured description must never leave the old
        // reference behind.
        settings.secret = None;

        let Some(store) = &self.secret_store else {
            warn!("No secret store has been registered; sensitive export settings will be preserved in plaintext");
            return Ok(DestinationOptions::AzureBlob(settings));
        };

        let secrets = BlobSecrets {
            connection_string: settings.connection_string.clone(),
            blob_container_uri: settings.blob_container_uri.clone(),
        };

        let name = operation_name(operation_id);
        let version = store
            .set_secret(&name, &serde_json::to_string(&secrets)?)
            .await?;

        settings.connection_string = None;
        settings.blob_container_uri = None;
        settings.secret = Some(SecretKey { name, version });

        info!(operation_id = %operation_id, "Secured destination credentials in the secret store");
        Ok(DestinationOptions::AzureBlob(settings))
    }

    async fn create(
        &self,
        options: &DestinationOptions,
        operation_id: Uuid,
    ) -> Result<Box<dyn ExportSink>> {
        let DestinationOptions::AzureBlob(settings) = options;
        let settings = self.retrieve(settings).await?;
        let container = self.containers.open(&settings.endpoint()?).await?;

        Ok(Box::new(AzureBlobExportSink::new(
            Arc::clone(&self.file_store),
            container,
            operation_id,
        )))
    }

    async fn complete_copy(&self, options: &DestinationOptions) -> Result<()> {
        let DestinationOptions::AzureBlob(settings) = options;
        let Some(secret) = &settings.secret else {
            return Ok(());
        };

        match &self.secret_store {
            None => {
                warn!(
                    secret = %secret.name,
                    "No secret store has been registered, but a secret was previously configured; unable to clean up sensitive information"
                );
            }
            Some(store) => {
                if store.delete_secret(&secret.name).await? {
                    info!(secret = %secret.name, "Cleaned up sensitive information from the secret store");
                } else {
                    warn!(secret = %secret.name, "Sensitive information has already been deleted for this operation");
                }
            }
        }
        Ok(())
    }
}

/// One line of the destination error log
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorLogEntry {
    timestamp: DateTime<Utc>,
    identifier: String,
    error: String,
}

/// Sink that copies record payloads into an Azure Blob container
///
/// Data blobs land under `{operation}/results/{study}/{series}/{sop}.dcm`;
/// failure details are buffered and appended to `{operation}/errors.log` on
/// flush.
pub struct AzureBlobExportSink {
    file_store: Arc<dyn FileStore>,
    container: Arc<dyn BlobContainer>,
    operation_id: Uuid,
    errors: Vec<ErrorLogEntry>,
}

impl AzureBlobExportSink {
    /// Creates a sink writing under the given operation's prefix
    pub fn new(
        file_store: Arc<dyn FileStore>,
        container: Arc<dyn BlobContainer>,
        operation_id: Uuid,
    ) -> Self {
        Self {
            file_store,
            container,
            operation_id,
            errors: Vec::new(),
        }
    }

    fn data_blob_path(&self, identifier: &VersionedInstanceIdentifier) -> String {
        format!(
            "{}/results/{}/{}/{}.dcm",
            operation_name(self.operation_id),
            identifier.study_instance_uid,
            identifier.series_instance_uid,
            identifier.sop_instance_uid
        )
    }

    fn error_log_path(&self) -> String {
        format!("{}/errors.log", operation_name(self.operation_id))
    }

    fn record_error(&mut self, identifier: String, error: String) {
        self.errors.push(ErrorLogEntry {
            timestamp: Utc::now(),
            identifier,
            error,
        });
    }

    async fn copy_instance(&mut self, identifier: &VersionedInstanceIdentifier) -> bool {
        let data = match self.file_store.read_instance(identifier).await {
            Ok(data) => data,
            Err(err) => {
                self.record_error(identifier.to_string(), err.to_string());
                return false;
            }
        };

        let path = self.data_blob_path(identifier);
        match self.container.upload(&path, data).await {
            Ok(()) => true,
            Err(err) => {
                self.record_error(identifier.to_string(), err.to_string());
                false
            }
        }
    }
}

#[async_trait]
impl ExportSink for AzureBlobExportSink {
    async fn copy(&mut self, result: &ReadResult) -> bool {
        match result {
            ReadResult::Resolved(identifier) => self.copy_instance(identifier).await,
            ReadResult::Failed(failure) => {
                self.record_error(failure.identifier.to_string(), failure.error.to_string());
                false
            }
        }
    }

    fn error_href(&self) -> Url {
        let mut href = self.container.uri().clone();
        if let Ok(mut segments) = href.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&operation_name(self.operation_id))
                .push("errors.log");
        }
        href
    }

    async fn flush(&mut self) -> Result<()> {
        if self.errors.is_empty() {
            return Ok(());
        }

        let lines = self
            .errors
            .drain(..)
            .map(|entry| serde_json::to_string(&entry).map_err(CaravanError::from))
            .collect::<Result<Vec<_>>>()?;

        let path = self.error_log_path();
        self.container.append_lines(&path, lines).await
    }
}
