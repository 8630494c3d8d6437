use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseConnection, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use serde_json::Value;
use uuid::Uuid;

use crate::documents;

use super::{Collection, DocumentStore, StoreError, StoreKey, StoreResult, merge_object};

/// Store backed by the `documents` table (see the `migration` crate).
#[derive(Debug, Clone)]
pub struct SqlStore {
    database: DatabaseConnection,
}

impl SqlStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl DocumentStore for SqlStore {
    async fn put(
        &self,
        collection: Collection,
        user_id: &str,
        id: Option<&str>,
        value: Value,
    ) -> StoreResult<String> {
        let entity_id = id.map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string);
        let key = StoreKey::new(collection, user_id, &entity_id).to_string();

        let db_tx = self.database.begin().await?;
        let existing = documents::Entity::find_by_id(key.clone())
            .one(&db_tx)
            .await?;
        let model = documents::ActiveModel {
            key: ActiveValue::Set(key),
            collection: ActiveValue::Set(collection.as_str().to_string()),
            user_id: ActiveValue::Set(user_id.to_string()),
            entity_id: ActiveValue::Set(entity_id.clone()),
            body: ActiveValue::Set(value),
            updated_at: ActiveValue::Set(Utc::now()),
        };
        if existing.is_some() {
            model.update(&db_tx).await?;
        } else {
            model.insert(&db_tx).await?;
        }
        db_tx.commit().await?;

        Ok(entity_id)
    }

    async fn get(
        &self,
        collection: Collection,
        user_id: &str,
    ) -> StoreResult<BTreeMap<String, Value>> {
        let rows = documents::Entity::find()
            .filter(documents::Column::Collection.eq(collection.as_str()))
            .filter(documents::Column::UserId.eq(user_id))
            .order_by_asc(documents::Column::EntityId)
            .all(&self.database)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.entity_id, row.body))
            .collect())
    }

    async fn patch(&self, key: &StoreKey, partial: Value) -> StoreResult<()> {
        let db_tx = self.database.begin().await?;
        let row = documents::Entity::find_by_id(key.to_string())
            .one(&db_tx)
            .await?
            .ok_or_else(|| StoreError::Missing(key.to_string()))?;

        let mut body = row.body.clone();
        merge_object(&mut body, partial)?;

        let mut model: documents::ActiveModel = row.into();
        model.body = ActiveValue::Set(body);
        model.updated_at = ActiveValue::Set(Utc::now());
        model.update(&db_tx).await?;
        db_tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, key: &StoreKey) -> StoreResult<()> {
        documents::Entity::delete_by_id(key.to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }
}
