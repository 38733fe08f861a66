use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use k8_schema::ResourceInstance;

use crate::ResourceStore;
use crate::StoreError;

#[derive(Debug)]
pub enum InMemoryError {
    LockPoisonError,
    AlreadyExists(String),
    NotFound,
}

type ReadPoisonError<'a> = PoisonError<RwLockReadGuard<'a, ItemMap>>;

impl<'a> From<ReadPoisonError<'a>> for InMemoryError {
    fn from(_error: ReadPoisonError) -> Self {
        Self::LockPoisonError
    }
}

type WritePoisonError<'a> = PoisonError<RwLockWriteGuard<'a, ItemMap>>;

impl<'a> From<WritePoisonError<'a>> for InMemoryError {
    fn from(_error: WritePoisonError) -> Self {
        Self::LockPoisonError
    }
}

impl fmt::Display for InMemoryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::AlreadyExists(name) => write!(f, "{} already exists", name),
            Self::LockPoisonError => write!(f, "lock poison error"),
        }
    }
}

impl std::error::Error for InMemoryError {}

impl StoreError for InMemoryError {
    fn not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ItemKey {
    plugin: String,
    kind: String,
    identity: String,
}

impl ItemKey {
    fn new(plugin: &str, kind: &str, identity: &str) -> Self {
        ItemKey {
            plugin: plugin.to_owned(),
            kind: kind.to_owned(),
            identity: identity.to_owned(),
        }
    }

    fn same_kind(&self, plugin: &str, kind: &str) -> bool {
        self.plugin == plugin && self.kind == kind
    }
}

#[derive(Debug)]
struct StoredItem {
    sequence: u64,
    instance: ResourceInstance,
}

#[derive(Debug, Default)]
struct ItemMap {
    next_sequence: u64,
    items: HashMap<ItemKey, StoredItem>,
}

/// store backed by process memory, lists in creation order
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    store: Arc<RwLock<ItemMap>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResourceStore for InMemoryStore {
    type StoreError = InMemoryError;

    async fn list(
        &self,
        plugin: &str,
        kind: &str,
    ) -> Result<Vec<ResourceInstance>, Self::StoreError> {
        let store = self.store.read()?;
        let mut items: Vec<&StoredItem> = store
            .items
            .iter()
            .filter(|(key, _)| key.same_kind(plugin, kind))
            .map(|(_, item)| item)
            .collect();
        items.sort_by_key(|item| item.sequence);
        Ok(items.into_iter().map(|item| item.instance.clone()).collect())
    }

    async fn get(
        &self,
        plugin: &str,
        kind: &str,
        identity: &str,
    ) -> Result<Option<ResourceInstance>, Self::StoreError> {
        let store = self.store.read()?;
        let item_key = ItemKey::new(plugin, kind, identity);
        Ok(store.items.get(&item_key).map(|item| item.instance.clone()))
    }

    async fn create(
        &self,
        plugin: &str,
        kind: &str,
        mut instance: ResourceInstance,
    ) -> Result<String, Self::StoreError> {
        let mut store = self.store.write()?;
        let duplicate = store.items.iter().any(|(key, item)| {
            key.same_kind(plugin, kind)
                && item.instance.metadata.name == instance.metadata.name
                && item.instance.metadata.namespace == instance.metadata.namespace
        });
        if duplicate {
            return Err(InMemoryError::AlreadyExists(instance.metadata.name));
        }

        let identity = Uuid::new_v4().to_string();
        instance.metadata.uid = identity.clone();
        instance.metadata.creation_timestamp = Some(Utc::now());

        let sequence = store.next_sequence;
        store.next_sequence += 1;
        store.items.insert(
            ItemKey::new(plugin, kind, &identity),
            StoredItem { sequence, instance },
        );
        debug!("{}/{}: created {}", plugin, kind, identity);
        Ok(identity)
    }

    async fn update(
        &self,
        plugin: &str,
        kind: &str,
        identity: &str,
        mut instance: ResourceInstance,
    ) -> Result<(), Self::StoreError> {
        let mut store = self.store.write()?;
        let item_key = ItemKey::new(plugin, kind, identity);
        let item = store
            .items
            .get_mut(&item_key)
            .ok_or(InMemoryError::NotFound)?;

        // identity and creation time belong to the store
        instance.metadata.uid = identity.to_owned();
        instance.metadata.creation_timestamp = item.instance.metadata.creation_timestamp;
        item.instance = instance;
        debug!("{}/{}: updated {}", plugin, kind, identity);
        Ok(())
    }

    async fn delete(
        &self,
        plugin: &str,
        kind: &str,
        identity: &str,
    ) -> Result<(), Self::StoreError> {
        let mut store = self.store.write()?;
        let item_key = ItemKey::new(plugin, kind, identity);
        store
            .items
            .remove(&item_key)
            .ok_or(InMemoryError::NotFound)?;
        debug!("{}/{}: deleted {}", plugin, kind, identity);
        Ok(())
    }
}
