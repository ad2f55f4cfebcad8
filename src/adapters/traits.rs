//! External collaborator contracts
//!
//! The pipeline consumes five external systems: the durable operation host,
//! the storage engine that resolves identifiers, the internal archive that
//! holds record payloads, the destination object store, and the secret
//! vault. Each is expressed here as a trait so concrete bindings (SQL,
//! vendor SDKs, vaults) stay outside the crate; adapters implement these and
//! get wired in at startup.

use crate::config::SecretString;
use crate::core::export::options::ExportSpecification;
use crate::domain::{
    OperationReference, Partition, Result, Uid, VersionedInstanceIdentifier,
};
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

/// Durable operation scheduling boundary
///
/// The pipeline hands a validated, secret-sanitized specification to this
/// client and treats everything past it (persistence, replay, retry) as
/// opaque.
#[async_trait]
pub trait OperationsClient: Send + Sync {
    /// Starts the durable export job under the caller's partition
    async fn start_export(
        &self,
        operation_id: Uuid,
        specification: &ExportSpecification,
        partition: &Partition,
    ) -> Result<OperationReference>;
}

/// Secret vault used to keep credentials out of persisted operation state
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Stores a secret and returns the version assigned to it
    async fn set_secret(&self, name: &str, value: &str) -> Result<String>;

    /// Fetches a specific version of a secret
    async fn get_secret(&self, name: &str, version: &str) -> Result<String>;

    /// Deletes a secret; returns `false` if it was already absent
    async fn delete_secret(&self, name: &str) -> Result<bool>;
}

/// Storage engine that resolves logical identifiers to concrete instances
///
/// Each method returns the matching instances in the store's canonical order,
/// or an empty list when nothing matches.
#[async_trait]
pub trait InstanceStore: Send + Sync {
    /// Resolves every instance within a study
    async fn instances_in_study(
        &self,
        partition_key: i32,
        study_instance_uid: &Uid,
    ) -> Result<Vec<VersionedInstanceIdentifier>>;

    /// Resolves every instance within a series
    async fn instances_in_series(
        &self,
        partition_key: i32,
        study_instance_uid: &Uid,
        series_instance_uid: &Uid,
    ) -> Result<Vec<VersionedInstanceIdentifier>>;

    /// Resolves a single instance
    async fn instance(
        &self,
        partition_key: i32,
        study_instance_uid: &Uid,
        series_instance_uid: &Uid,
        sop_instance_uid: &Uid,
    ) -> Result<Vec<VersionedInstanceIdentifier>>;
}

/// Internal archive holding the stored record payloads
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Reads the payload of a resolved instance
    async fn read_instance(&self, identifier: &VersionedInstanceIdentifier) -> Result<Vec<u8>>;
}

/// A destination container accepting copied records
#[async_trait]
pub trait BlobContainer: Send + Sync {
    /// Writes one blob at the given path, replacing any existing content
    async fn upload(&self, path: &str, data: Vec<u8>) -> Result<()>;

    /// Appends lines to a text blob, creating it if absent
    async fn append_lines(&self, path: &str, lines: Vec<String>) -> Result<()>;

    /// Base URI of the container, without credentials
    fn uri(&self) -> &Url;
}

/// How a destination container is addressed once credentials are in memory
#[derive(Debug, Clone)]
pub enum BlobContainerEndpoint {
    /// Container URI, possibly carrying a SAS token
    Uri(Url),

    /// Account connection string plus container name
    ConnectionString {
        connection_string: SecretString,
        container_name: String,
    },
}

/// Opens destination containers from reconstituted settings
///
/// This is the seam to the vendor object-storage SDK. The sink provider
/// resolves settings to a [`BlobContainerEndpoint`] and asks the opener for a
/// live container.
#[async_trait]
pub trait BlobContainerOpener: Send + Sync {
    /// Opens the container addressed by the endpoint
    async fn open(&self, endpoint: &BlobContainerEndpoint) -> Result<Arc<dyn BlobContainer>>;
}
