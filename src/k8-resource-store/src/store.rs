use std::fmt::Debug;
use std::fmt::Display;

use async_trait::async_trait;

use k8_schema::ResourceInstance;

/// error returned by resource store
pub trait StoreError: Debug + Display {
    /// instance doesn't exist
    fn not_found(&self) -> bool;
}

/// CRUD over resource instances keyed by (plugin, kind, identity).
/// the store assigns identity and creation timestamp on create
#[async_trait]
pub trait ResourceStore: Send + Sync {
    type StoreError: StoreError + Send + Sync;

    async fn list(
        &self,
        plugin: &str,
        kind: &str,
    ) -> Result<Vec<ResourceInstance>, Self::StoreError>;

    async fn get(
        &self,
        plugin: &str,
        kind: &str,
        identity: &str,
    ) -> Result<Option<ResourceInstance>, Self::StoreError>;

    /// store new instance, returns assigned identity
    async fn create(
        &self,
        plugin: &str,
        kind: &str,
        instance: ResourceInstance,
    ) -> Result<String, Self::StoreError>;

    async fn update(
        &self,
        plugin: &str,
        kind: &str,
        identity: &str,
        instance: ResourceInstance,
    ) -> Result<(), Self::StoreError>;

    async fn delete(
        &self,
        plugin: &str,
        kind: &str,
        identity: &str,
    ) -> Result<(), Self::StoreError>;
}
