//! Documents table backing [`SqlStore`](crate::store::SqlStore).
//!
//! One row per stored entity; `key` is the namespaced
//! `{collection}/{user_id}/{entity_id}` string.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub collection: String,
    pub user_id: String,
    pub entity_id: String,
    pub body: Json,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
