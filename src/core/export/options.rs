//! Export data options envelope
//!
//! Sources and destinations are described by a closed tagged pair of kind and
//! settings. The settings shape is determined solely by the kind; nothing in
//! the pipeline interprets settings generically. The envelope is what gets
//! persisted into durable operation state, so its serde shape is a contract:
//! adjacently tagged, camelCase, and free of plaintext credentials once the
//! destination has been secured.

use crate::adapters::traits::BlobContainerEndpoint;
use crate::config::SecretString;
use crate::domain::{CaravanError, DicomIdentifier, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Kinds of record-selection mechanisms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    /// An explicit, ordered list of study/series/instance identifiers
    Identifiers,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Identifiers => write!(f, "identifiers"),
        }
    }
}

/// Kinds of export destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DestinationKind {
    /// An Azure Blob storage container
    AzureBlob,
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DestinationKind::AzureBlob => write!(f, "azureBlob"),
        }
    }
}

/// A typed description of an export source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "settings", rename_all = "camelCase")]
pub enum SourceOptions {
    /// Settings for the identifier-list source
    Identifiers(IdentifierSourceSettings),
}

impl SourceOptions {
    /// Returns the kind tag of this description
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceOptions::Identifiers(_) => SourceKind::Identifiers,
        }
    }

    /// Wraps an identifier list as a source description
    pub fn identifiers(values: Vec<DicomIdentifier>) -> Self {
        SourceOptions::Identifiers(IdentifierSourceSettings { values })
    }
}

/// A typed description of an export destination
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "settings", rename_all = "camelCase")]
pub enum DestinationOptions {
    /// Settings for the Azure Blob sink
    AzureBlob(AzureBlobSinkSettings),
}

impl DestinationOptions {
    /// Returns the kind tag of this description
    pub fn kind(&self) -> DestinationKind {
        match self {
            DestinationOptions::AzureBlob(_) => DestinationKind::AzureBlob,
        }
    }
}

/// The full export request: one source, one destination
///
/// Immutable after validation. Secret-securing replaces the destination by
/// constructing a new specification; the original value is never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSpecification {
    pub source: SourceOptions,
    pub destination: DestinationOptions,
}

/// Settings for the identifier-list source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierSourceSettings {
    /// Ordered identifiers to export; consumed front to back
    pub values: Vec<DicomIdentifier>,
}

impl IdentifierSourceSettings {
    /// Validates the identifier list, surfacing the first violation found
    pub fn validate(&self, max_identifiers: usize) -> Result<()> {
        if self.values.is_empty() {
            return Err(CaravanError::validation(
                "source.settings.values",
                "at least one identifier is required",
            ));
        }
        if self.values.len() > max_identifiers {
            return Err(CaravanError::validation(
                "source.settings.values",
                format!(
                    "at most {max_identifiers} identifiers may be specified; got {}",
                    self.values.len()
                ),
            ));
        }
        for identifier in &self.values {
            identifier
                .validate()
                .map_err(|message| CaravanError::validation("source.settings.values", message))?;
        }
        Ok(())
    }
}

/// Reference to a vaulted destination secret
///
/// Present on a destination description exactly when the description carries
/// no plaintext credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretKey {
    pub name: String,
    pub version: String,
}

/// Settings for the Azure Blob sink
///
/// The destination is addressed either by a container URI (which may embed a
/// SAS token) or by an account connection string plus container name. After
/// secret-securing, both credential-bearing fields are cleared and `secret`
/// points at the vault entry holding them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureBlobSinkSettings {
    /// Container URI, possibly carrying a SAS token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_container_uri: Option<Url>,

    /// Storage account connection string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<SecretString>,

    /// Container name, required with a connection string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_container_name: Option<String>,

    /// Vault reference stamped by secret-securing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<SecretKey>,
}

impl AzureBlobSinkSettings {
    /// Validates the settings, surfacing the first violation found
    ///
    /// A secured description (with `secret` populated) carries no plaintext
    /// endpoint by design and is accepted as-is.
    pub fn validate(&self) -> Result<()> {
        if self.secret.is_some() {
            return Ok(());
        }
        match (
            &self.blob_container_uri,
            &self.connection_string,
            &self.blob_container_name,
        ) {
            (Some(_), None, None) => Ok(()),
            (None, Some(_), Some(_)) => Ok(()),
            (Some(_), _, _) => Err(CaravanError::validation(
                "destination.settings.blobContainerUri",
                "cannot be combined with a connection string or container name",
            )),
            (None, Some(_), None) => Err(CaravanError::validation(
                "destination.settings.blobContainerName",
                "is required when a connection string is used",
            )),
            (None, None, Some(_)) => Err(CaravanError::validation(
                "destination.settings.connectionString",
                "is required when a container name is used",
            )),
            (None, None, None) => Err(CaravanError::validation(
                "destination.settings.blobContainerUri",
                "either a container URI or a connection string and container name must be provided",
            )),
        }
    }

    /// Resolves the destination endpoint from reconstituted settings
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no plaintext endpoint is present,
    /// which indicates the settings were never reconstituted from the vault.
    pub fn endpoint(&self) -> Result<BlobContainerEndpoint> {
        if let Some(uri) = &self.blob_container_uri {
            return Ok(BlobContainerEndpoint::Uri(uri.clone()));
        }
        match (&self.connection_string, &self.blob_container_name) {
            (Some(connection_string), Some(container_name)) => {
                Ok(BlobContainerEndpoint::ConnectionString {
                    connection_string: connection_string.clone(),
                    container_name: container_name.clone(),
                })
            }
            _ => Err(CaravanError::Configuration(
                "destination settings carry no usable endpoint; the secret may not have been retrieved".to_string(),
            )),
        }
    }
}
