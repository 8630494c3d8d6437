//! "Data changed" notifications.
//!
//! The engine publishes a [`ChangeEvent`] after every successful write. Slow
//! subscribers may miss events (they get `RecvError::Lagged`); a reload is
//! always a correct reaction.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangedEntity {
    Transaction,
    Category,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub user_id: String,
    pub entity: ChangedEntity,
    pub action: ChangeAction,
    pub id: String,
}
