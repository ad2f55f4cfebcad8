//! Shared in-memory fakes for the external collaborators
//!
//! Each fake implements one adapter trait over a `Mutex`-guarded map so
//! integration tests can run the whole pipeline without any external system.

#![allow(dead_code)]

use async_trait::async_trait;
use caravan::adapters::traits::{
    BlobContainer, BlobContainerEndpoint, BlobContainerOpener, FileStore, InstanceStore,
    OperationsClient, SecretStore,
};
use caravan::core::export::ExportSpecification;
use caravan::domain::{
    CaravanError, OperationReference, Partition, Result, Uid, VersionedInstanceIdentifier,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;
use uuid::Uuid;

/// Instance store over a flat list of (partition, instance) rows
#[derive(Default)]
pub struct InMemoryInstanceStore {
    rows: Mutex<Vec<(i32, VersionedInstanceIdentifier)>>,
}

impl InMemoryInstanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, partition_key: i32, study: &str, series: &str, sop: &str, version: u64) {
        let identifier = VersionedInstanceIdentifier::new(study, series, sop, version).unwrap();
        self.rows.lock().unwrap().push((partition_key, identifier));
    }

    fn select(
        &self,
        partition_key: i32,
        predicate: impl Fn(&VersionedInstanceIdentifier) -> bool,
    ) -> Vec<VersionedInstanceIdentifier> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, row)| *key == partition_key && predicate(row))
            .map(|(_, row)| row.clone())
            .collect()
    }
}

#[async_trait]
impl InstanceStore for InMemoryInstanceStore {
    async fn instances_in_study(
        &self,
        partition_key: i32,
        study: &Uid,
    ) -> Result<Vec<VersionedInstanceIdentifier>> {
        Ok(self.select(partition_key, |row| row.study_instance_uid == *study))
    }

    async fn instances_in_series(
        &self,
        partition_key: i32,
        study: &Uid,
        series: &Uid,
    ) -> Result<Vec<VersionedInstanceIdentifier>> {
        Ok(self.select(partition_key, |row| {
            row.study_instance_uid == *study && row.series_instance_uid == *series
        }))
    }

    async fn instance(
        &self,
        partition_key: i32,
        study: &Uid,
        series: &Uid,
        sop: &Uid,
    ) -> Result<Vec<VersionedInstanceIdentifier>> {
        Ok(self.select(partition_key, |row| {
            row.study_instance_uid == *study
                && row.series_instance_uid == *series
                && row.sop_instance_uid == *sop
        }))
    }
}

/// File store keyed by instance version
#[derive(Default)]
pub struct InMemoryFileStore {
    files: Mutex<HashMap<u64, Vec<u8>>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, version: u64, data: impl Into<Vec<u8>>) {
        self.files.lock().unwrap().insert(version, data.into());
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn read_instance(&self, identifier: &VersionedInstanceIdentifier) -> Result<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(&identifier.version)
            .cloned()
            .ok_or_else(|| {
                CaravanError::DataStore(format!("no payload for version {}", identifier.version))
            })
    }
}

/// Secret vault with one version list per secret name
#[derive(Default)]
pub struct InMemorySecretStore {
    secrets: Mutex<HashMap<String, Vec<String>>>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.secrets.lock().unwrap().contains_key(name)
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn set_secret(&self, name: &str, value: &str) -> Result<String> {
        let mut secrets = self.secrets.lock().unwrap();
        let versions = secrets.entry(name.to_string()).or_default();
        versions.push(value.to_string());
        Ok(versions.len().to_string())
    }

    async fn get_secret(&self, name: &str, version: &str) -> Result<String> {
        let index: usize = version
            .parse()
            .map_err(|_| CaravanError::DataStore(format!("bad secret version '{version}'")))?;
        self.secrets
            .lock()
            .unwrap()
            .get(name)
            .and_then(|versions| versions.get(index.checked_sub(1)?))
            .cloned()
            .ok_or_else(|| {
                CaravanError::DataStore(format!("secret '{name}' version '{version}' not found"))
            })
    }

    async fn delete_secret(&self, name: &str) -> Result<bool> {
        Ok(self.secrets.lock().unwrap().remove(name).is_some())
    }
}

/// Destination container that records uploads and appended lines
pub struct InMemoryBlobContainer {
    uri: Url,
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    lines: Mutex<HashMap<String, Vec<String>>>,
}

impl InMemoryBlobContainer {
    pub fn new(uri: &str) -> Self {
        Self {
            uri: Url::parse(uri).unwrap(),
            blobs: Mutex::new(HashMap::new()),
            lines: Mutex::new(HashMap::new()),
        }
    }

    pub fn blob(&self, path: &str) -> Option<Vec<u8>> {
        self.blobs.lock().unwrap().get(path).cloned()
    }

    pub fn blob_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.blobs.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn appended_lines(&self, path: &str) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl BlobContainer for InMemoryBlobContainer {
    async fn upload(&self, path: &str, data: Vec<u8>) -> Result<()> {
        self.blobs.lock().unwrap().insert(path.to_string(), data);
        Ok(())
    }

    async fn append_lines(&self, path: &str, lines: Vec<String>) -> Result<()> {
        self.lines
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .extend(lines);
        Ok(())
    }

    fn uri(&self) -> &Url {
        &self.uri
    }
}

/// Opener that hands out one fixed container and records every endpoint
pub struct StaticContainerOpener {
    container: Arc<InMemoryBlobContainer>,
    opened: Mutex<Vec<BlobContainerEndpoint>>,
}

impl StaticContainerOpener {
    pub fn new(container: Arc<InMemoryBlobContainer>) -> Self {
        Self {
            container,
            opened: Mutex::new(Vec::new()),
        }
    }

    pub fn opened_endpoints(&self) -> Vec<BlobContainerEndpoint> {
        self.opened.lock().unwrap().clone()
    }

    pub fn open_count(&self) -> usize {
        self.opened.lock().unwrap().len()
    }
}

#[async_trait]
impl BlobContainerOpener for StaticContainerOpener {
    async fn open(&self, endpoint: &BlobContainerEndpoint) -> Result<Arc<dyn BlobContainer>> {
        self.opened.lock().unwrap().push(endpoint.clone());
        Ok(Arc::clone(&self.container) as Arc<dyn BlobContainer>)
    }
}

/// Operation client that records every started job
#[derive(Default)]
pub struct RecordingOperationsClient {
    calls: Mutex<Vec<(Uuid, ExportSpecification, Partition)>>,
}

impl RecordingOperationsClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(Uuid, ExportSpecification, Partition)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OperationsClient for RecordingOperationsClient {
    async fn start_export(
        &self,
        operation_id: Uuid,
        specification: &ExportSpecification,
        partition: &Partition,
    ) -> Result<OperationReference> {
        self.calls
            .lock()
            .unwrap()
            .push((operation_id, specification.clone(), partition.clone()));
        let href = Url::parse(&format!("https://host.example.com/operations/{operation_id}"))
            .expect("operation href");
        Ok(OperationReference::new(operation_id, href))
    }
}
