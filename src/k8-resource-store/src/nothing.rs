// implementation of resource store that rejects every call
// it is used for testing how views report store failures
use std::fmt;

use async_trait::async_trait;

use k8_schema::ResourceInstance;

use crate::ResourceStore;
use crate::StoreError;

#[derive(Debug)]
pub enum DoNothingError {
    Unavailable,
}

impl fmt::Display for DoNothingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "resource store unavailable"),
        }
    }
}

impl std::error::Error for DoNothingError {}

impl StoreError for DoNothingError {
    fn not_found(&self) -> bool {
        false
    }
}

#[derive(Debug, Default)]
pub struct DoNothingStore();

#[async_trait]
impl ResourceStore for DoNothingStore {
    type StoreError = DoNothingError;

    async fn list(
        &self,
        _plugin: &str,
        _kind: &str,
    ) -> Result<Vec<ResourceInstance>, Self::StoreError> {
        Err(DoNothingError::Unavailable)
    }

    async fn get(
        &self,
        _plugin: &str,
        _kind: &str,
        _identity: &str,
    ) -> Result<Option<ResourceInstance>, Self::StoreError> {
        Err(DoNothingError::Unavailable)
    }

    async fn create(
        &self,
        _plugin: &str,
        _kind: &str,
        _instance: ResourceInstance,
    ) -> Result<String, Self::StoreError> {
        Err(DoNothingError::Unavailable)
    }

    async fn update(
        &self,
        _plugin: &str,
        _kind: &str,
        _identity: &str,
        _instance: ResourceInstance,
    ) -> Result<(), Self::StoreError> {
        Err(DoNothingError::Unavailable)
    }

    async fn delete(
        &self,
        _plugin: &str,
        _kind: &str,
        _identity: &str,
    ) -> Result<(), Self::StoreError> {
        Err(DoNothingError::Unavailable)
    }
}
