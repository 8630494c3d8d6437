use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Collection, DocumentStore, StoreError, StoreKey, StoreResult, merge_object};

type Bucket = BTreeMap<String, Value>;

/// In-process store. Data lives as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    buckets: RwLock<BTreeMap<(Collection, String), Bucket>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn put(
        &self,
        collection: Collection,
        user_id: &str,
        id: Option<&str>,
        value: Value,
    ) -> StoreResult<String> {
        let id = id.map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string);
        let mut buckets = self.buckets.write().await;
        buckets
            .entry((collection, user_id.to_string()))
            .or_default()
            .insert(id.clone(), value);
        Ok(id)
    }

    async fn get(
        &self,
        collection: Collection,
        user_id: &str,
    ) -> StoreResult<BTreeMap<String, Value>> {
        let buckets = self.buckets.read().await;
        Ok(buckets
            .get(&(collection, user_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn patch(&self, key: &StoreKey, partial: Value) -> StoreResult<()> {
        let mut buckets = self.buckets.write().await;
        let doc = buckets
            .get_mut(&(key.collection, key.user_id.clone()))
            .and_then(|bucket| bucket.get_mut(&key.entity_id))
            .ok_or_else(|| StoreError::Missing(key.to_string()))?;
        merge_object(doc, partial)
    }

    async fn delete(&self, key: &StoreKey) -> StoreResult<()> {
        let mut buckets = self.buckets.write().await;
        if let Some(bucket) = buckets.get_mut(&(key.collection, key.user_id.clone())) {
            bucket.remove(&key.entity_id);
        }
        Ok(())
    }
}
