//! Provider registries for sources and sinks
//!
//! Each registry maps a kind tag to the provider that understands that
//! kind's settings. Registries are built once at startup; asking for an
//! unregistered kind is a configuration error. Providers are stateless
//! beyond their constructor-injected collaborators, so registries are cheap
//! to share across invocations.

use crate::core::export::options::{
    DestinationKind, DestinationOptions, SourceKind, SourceOptions,
};
use crate::core::sinks::ExportSink;
use crate::core::sources::ExportSource;
use crate::domain::{CaravanError, Partition, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Capability set implemented once per source kind
#[async_trait]
pub trait ExportSourceProvider: Send + Sync {
    /// The kind this provider understands
    fn kind(&self) -> SourceKind;

    /// Validates settings, surfacing the first violation found
    fn validate(&self, options: &SourceOptions) -> Result<()>;

    /// Instantiates a source scoped to a partition
    async fn create(
        &self,
        options: &SourceOptions,
        partition: &Partition,
    ) -> Result<Box<dyn ExportSource>>;
}

/// Capability set implemented once per destination kind
#[async_trait]
pub trait ExportSinkProvider: Send + Sync {
    /// The kind this provider understands
    fn kind(&self) -> DestinationKind;

    /// Validates settings, surfacing the first violation found
    fn validate(&self, options: &DestinationOptions) -> Result<()>;

    /// Moves sensitive settings into the secret store, returning a new,
    /// sanitized description; the input value is consumed, never aliased
    async fn secure(
        &self,
        options: DestinationOptions,
        operation_id: Uuid,
    ) -> Result<DestinationOptions>;

    /// Instantiates the sink, reconstituting secrets as needed
    async fn create(
        &self,
        options: &DestinationOptions,
        operation_id: Uuid,
    ) -> Result<Box<dyn ExportSink>>;

    /// Cleanup hook invoked once the operation reaches a terminal state
    async fn complete_copy(&self, options: &DestinationOptions) -> Result<()>;
}

/// Registry of source providers keyed by kind
pub struct ExportSourceRegistry {
    providers: HashMap<SourceKind, Arc<dyn ExportSourceProvider>>,
}

impl ExportSourceRegistry {
    /// Builds the registry from the providers configured at startup
    pub fn new(providers: impl IntoIterator<Item = Arc<dyn ExportSourceProvider>>) -> Self {
        Self {
            providers: providers
                .into_iter()
                .map(|provider| (provider.kind(), provider))
                .collect(),
        }
    }

    fn provider(&self, kind: SourceKind) -> Result<&Arc<dyn ExportSourceProvider>> {
        self.providers.get(&kind).ok_or_else(|| {
            CaravanError::Configuration(format!("no provider registered for source kind '{kind}'"))
        })
    }

    /// Validates a source description
    pub fn validate(&self, options: &SourceOptions) -> Result<()> {
        self.provider(options.kind())?.validate(options)
    }

    /// Creates a source instance scoped to a partition
    pub async fn create(
        &self,
        options: &SourceOptions,
        partition: &Partition,
    ) -> Result<Box<dyn ExportSource>> {
        self.provider(options.kind())?.create(options, partition).await
    }
}

/// Registry of sink providers keyed by kind
pub struct ExportSinkRegistry {
    providers: HashMap<DestinationKind, Arc<dyn ExportSinkProvider>>,
}

impl ExportSinkRegistry {
    /// Builds the registry from the providers configured at startup
    pub fn new(providers: impl IntoIterator<Item = Arc<dyn ExportSinkProvider>>) -> Self {
        Self {
            providers: providers
                .into_iter()
                .map(|provider| (provider.kind(), provider))
                .collect(),
        }
    }

    fn provider(&self, kind: DestinationKind) -> Result<&Arc<dyn ExportSinkProvider>> {
        self.providers.get(&kind).ok_or_else(|| {
            CaravanError::Configuration(format!(
                "no provider registered for destination kind '{kind}'"
            ))
        })
    }

    /// Validates a destination description
    pub fn validate(&self, options: &DestinationOptions) -> Result<()> {
        self.provider(options.kind())?.validate(options)
    }

    /// Secures sensitive destination settings, returning a new description
    pub async fn secure(
        &self,
        options: DestinationOptions,
        operation_id: Uuid,
    ) -> Result<DestinationOptions> {
        self.provider(options.kind())?.secure(options, operation_id).await
    }

    /// Creates a sink instance for the given operation
    pub async fn create(
        &self,
        options: &DestinationOptions,
        operation_id: Uuid,
    ) -> Result<Box<dyn ExportSink>> {
        self.provider(options.kind())?.create(options, operation_id).await
    }

    /// Runs the terminal-state cleanup hook for a destination
    pub async fn complete_copy(&self, options: &DestinationOptions) -> Result<()> {
        self.provider(options.kind())?.complete_copy(options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::options::IdentifierSourceSettings;

    #[test]
    fn test_empty_registry_rejects_kind_with_configuration_error() {
        let registry = ExportSourceRegistry::new(Vec::new());
        let options = SourceOptions::Identifiers(IdentifierSourceSettings { values: vec![] });
        let err = registry.validate(&options).unwrap_err();
        assert!(matches!(err, CaravanError::Configuration(_)));
        assert!(err.to_string().contains("identifiers"));
    }

    #[test]
    fn test_empty_sink_registry_rejects_kind() {
        let registry = ExportSinkRegistry::new(Vec::new());
        let options = DestinationOptions::AzureBlob(Default::default());
        let err = registry.validate(&options).unwrap_err();
        assert!(err.to_string().contains("azureBlob"));
    }
}
