use serde::Serialize;

use crate::{
    Category, CategoryPatch, ChangeAction, ChangedEntity, DEFAULT_CATEGORIES, EngineError,
    NewCategory, ResultEngine,
    categories::{CategoryDoc, CategoryPatchDoc},
    store::{Collection, StoreError, StoreKey},
    util::category_name_key,
    validation::{validate_category_patch, validate_new_category},
};

use super::{Engine, require_user_id};

/// Result of [`Engine::bootstrap_default_categories`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BootstrapOutcome {
    /// The user already owned categories; nothing was written.
    AlreadyBootstrapped { existing: usize },
    Created { created: usize, failed: usize },
}

impl BootstrapOutcome {
    pub fn created(self) -> usize {
        match self {
            Self::AlreadyBootstrapped { .. } => 0,
            Self::Created { created, .. } => created,
        }
    }

    pub fn message(self) -> String {
        match self {
            Self::AlreadyBootstrapped { .. } => "user already has categories".to_string(),
            Self::Created { created, failed: 0 } => {
                format!("created {created} default categories")
            }
            Self::Created { created, failed } => {
                format!("created {created} default categories ({failed} failed)")
            }
        }
    }
}

impl Engine {
    /// Categories of the user, ordered by name.
    pub async fn list_categories(&self, user_id: &str) -> ResultEngine<Vec<Category>> {
        let user_id = require_user_id(user_id)?;
        let docs = self.store.get(Collection::Categories, user_id).await?;

        let mut categories = docs
            .into_iter()
            .map(|(id, value)| Category::from_document(id, value))
            .collect::<Result<Vec<_>, _>>()?;
        categories.sort_by_cached_key(|c| (category_name_key(&c.name), c.id.clone()));
        Ok(categories)
    }

    /// Looks up one category of the user.
    pub async fn category(&self, user_id: &str, category_id: &str) -> ResultEngine<Category> {
        self.list_categories(user_id)
            .await?
            .into_iter()
            .find(|c| c.id == category_id)
            .ok_or_else(EngineError::category_not_found)
    }

    /// Validates and stores a new category. Names are unique per user,
    /// ignoring case.
    pub async fn create_category(&self, user_id: &str, input: &NewCategory) -> ResultEngine<String> {
        let user_id = require_user_id(user_id)?;
        let valid = validate_new_category(input)?;

        let existing = self.list_categories(user_id).await?;
        ensure_unique_name(&existing, &valid.name, None)?;

        let doc = CategoryDoc {
            user_id: user_id.to_string(),
            name: valid.name,
            description: valid.description,
            color: valid.color,
            spending_limit_minor: valid.spending_limit,
        };
        let value = serde_json::to_value(&doc).map_err(StoreError::from)?;
        let id = self
            .store
            .put(Collection::Categories, user_id, None, value)
            .await?;

        tracing::info!("user {user_id} created category {id} ({})", doc.name);
        self.notify(user_id, ChangedEntity::Category, ChangeAction::Created, &id);
        Ok(id)
    }

    /// Applies a rename / recolor / limit change. Only the fields present in
    /// the patch are validated and written.
    pub async fn update_category(
        &self,
        user_id: &str,
        category_id: &str,
        patch: &CategoryPatch,
    ) -> ResultEngine<()> {
        let user_id = require_user_id(user_id)?;
        let valid = validate_category_patch(patch)?;

        let existing = self.list_categories(user_id).await?;
        if !existing.iter().any(|c| c.id == category_id) {
            return Err(EngineError::category_not_found());
        }
        if patch.is_empty() {
            return Ok(());
        }
        if let Some(name) = &valid.name {
            ensure_unique_name(&existing, name, Some(category_id))?;
        }

        let doc = CategoryPatchDoc {
            name: valid.name,
            description: valid.description,
            color: valid.color,
            spending_limit_minor: valid.spending_limit,
        };
        let value = serde_json::to_value(&doc).map_err(StoreError::from)?;
        self.store
            .patch(
                &StoreKey::new(Collection::Categories, user_id, category_id),
                value,
            )
            .await?;

        tracing::info!("user {user_id} updated category {category_id}");
        self.notify(
            user_id,
            ChangedEntity::Category,
            ChangeAction::Updated,
            category_id,
        );
        Ok(())
    }

    /// Deletes a category nobody references. Referenced categories are never
    /// cascaded: the call fails with [`EngineError::CategoryInUse`].
    pub async fn delete_category(&self, user_id: &str, category_id: &str) -> ResultEngine<()> {
        let user_id = require_user_id(user_id)?;
        let category = self.category(user_id, category_id).await?;

        if self.has_transactions(user_id, category_id).await? {
            tracing::warn!(
                "user {user_id} tried to delete category {category_id} still in use"
            );
            return Err(EngineError::CategoryInUse(category.name));
        }

        self.store
            .delete(&StoreKey::new(
                Collection::Categories,
                user_id,
                category_id,
            ))
            .await?;

        tracing::info!("user {user_id} deleted category {category_id}");
        self.notify(
            user_id,
            ChangedEntity::Category,
            ChangeAction::Deleted,
            category_id,
        );
        Ok(())
    }

    /// Creates the default catalog for a user who owns no category yet.
    ///
    /// Best effort: individual failures are logged and counted. The call only
    /// fails when not a single default could be created, returning the first
    /// failure.
    ///
    /// Two concurrent first logins may both see zero categories; the duplicate
    /// name check is then the only thing keeping the catalog single.
    pub async fn bootstrap_default_categories(
        &self,
        user_id: &str,
    ) -> ResultEngine<BootstrapOutcome> {
        let user_id = require_user_id(user_id)?;
        let existing = self.list_categories(user_id).await?;
        if !existing.is_empty() {
            tracing::debug!("user {user_id} already has {} categories", existing.len());
            return Ok(BootstrapOutcome::AlreadyBootstrapped {
                existing: existing.len(),
            });
        }

        let mut created = 0;
        let mut failures: Vec<EngineError> = Vec::new();
        for default in DEFAULT_CATEGORIES {
            match self
                .create_category(user_id, &default.to_new_category())
                .await
            {
                Ok(_) => created += 1,
                Err(err) => {
                    tracing::warn!(
                        "user {user_id}: default category {} not created: {err}",
                        default.name
                    );
                    failures.push(err);
                }
            }
        }

        if created == 0
            && let Some(first) = failures.into_iter().next()
        {
            tracing::error!("user {user_id}: no default category could be created");
            return Err(first);
        }

        let outcome = BootstrapOutcome::Created {
            created,
            failed: DEFAULT_CATEGORIES.len() - created,
        };
        tracing::info!("user {user_id}: {}", outcome.message());
        Ok(outcome)
    }
}

fn ensure_unique_name(
    existing: &[Category],
    name: &str,
    except_id: Option<&str>,
) -> ResultEngine<()> {
    let key = category_name_key(name);
    let clash = existing
        .iter()
        .filter(|c| except_id != Some(c.id.as_str()))
        .any(|c| category_name_key(&c.name) == key);
    if clash {
        return Err(EngineError::DuplicateName(name.to_string()));
    }
    Ok(())
}
