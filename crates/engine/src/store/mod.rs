//! Persistence collaborator.
//!
//! The engine only talks to a user-scoped key-value document store. Keys are
//! namespaced as `{collection}/{user_id}/{entity_id}` and values are JSON
//! objects. Two adapters ship with the crate: [`MemoryStore`] and the
//! SQLite-backed [`SqlStore`].

use std::{collections::BTreeMap, fmt};

use async_trait::async_trait;
use sea_orm::DbErr;
use serde_json::Value;
use thiserror::Error;

mod memory;
mod sql;

pub use memory::MemoryStore;
pub use sql::SqlStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised by store adapters.
///
/// These never reach callers verbatim: the engine logs them and reports a
/// generic storage failure instead.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("invalid document: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("\"{0}\" key not found!")]
    Missing(String),
    #[error("{0}")]
    Backend(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collection {
    Transactions,
    Categories,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Categories => "categories",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully qualified document key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StoreKey {
    pub collection: Collection,
    pub user_id: String,
    pub entity_id: String,
}

impl StoreKey {
    pub fn new(collection: Collection, user_id: &str, entity_id: &str) -> Self {
        Self {
            collection,
            user_id: user_id.to_string(),
            entity_id: entity_id.to_string(),
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.collection, self.user_id, self.entity_id)
    }
}

#[async_trait]
pub trait DocumentStore: fmt::Debug + Send + Sync {
    /// Writes `value` under a new key. When `id` is `None` the store assigns
    /// one. Returns the entity id.
    async fn put(
        &self,
        collection: Collection,
        user_id: &str,
        id: Option<&str>,
        value: Value,
    ) -> StoreResult<String>;

    /// Returns every document of the user's collection, keyed by entity id.
    /// An empty map when there are none.
    async fn get(
        &self,
        collection: Collection,
        user_id: &str,
    ) -> StoreResult<BTreeMap<String, Value>>;

    /// Merges the top-level fields of `partial` into an existing document.
    async fn patch(&self, key: &StoreKey, partial: Value) -> StoreResult<()>;

    /// Removes a document. Removing a missing key is not an error.
    async fn delete(&self, key: &StoreKey) -> StoreResult<()>;
}

/// Shallow merge used by the adapters' `patch`.
pub(crate) fn merge_object(target: &mut Value, partial: Value) -> StoreResult<()> {
    let (Value::Object(target), Value::Object(partial)) = (target, partial) else {
        return Err(StoreError::Backend(
            "patch requires JSON objects on both sides".to_string(),
        ));
    };
    for (field, value) in partial {
        target.insert(field, value);
    }
    Ok(())
}
