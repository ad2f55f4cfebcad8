//! External integrations for Caravan.
//!
//! This layer holds the trait contracts the pipeline requires of its
//! external collaborators. Concrete bindings (SQL instance stores, vendor
//! blob SDKs, key vaults, the durable operation host) implement these traits
//! and are injected when the registries and services are constructed.

pub mod traits;

pub use traits::{
    BlobContainer, BlobContainerEndpoint, BlobContainerOpener, FileStore, InstanceStore,
    OperationsClient, SecretStore,
};
