use crate::{
    ChangeAction, ChangedEntity, EngineError, NewTransaction, ResultEngine, Transaction,
    TransactionFilter, TransactionKind, TransactionPatch,
    store::{Collection, StoreError, StoreKey},
    transactions::{TransactionDoc, TransactionPatchDoc},
    validation::{validate_new_transaction, validate_transaction_patch},
};

use super::{Engine, require_user_id};

impl Engine {
    /// Every transaction of the user, newest first (ties by id).
    pub async fn list_transactions(&self, user_id: &str) -> ResultEngine<Vec<Transaction>> {
        let user_id = require_user_id(user_id)?;
        let docs = self.store.get(Collection::Transactions, user_id).await?;

        let mut transactions = docs
            .into_iter()
            .map(|(id, value)| Transaction::from_document(id, value))
            .collect::<Result<Vec<_>, _>>()?;
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(transactions)
    }

    /// Transactions matching every predicate of `filter`, newest first.
    pub async fn filter_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        let transactions = self.list_transactions(user_id).await?;
        Ok(filter.apply(&transactions))
    }

    pub async fn list_transactions_by_category(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> ResultEngine<Vec<Transaction>> {
        self.filter_transactions(user_id, &TransactionFilter::default().category_id(category_id))
            .await
    }

    pub async fn list_transactions_by_kind(
        &self,
        user_id: &str,
        kind: TransactionKind,
    ) -> ResultEngine<Vec<Transaction>> {
        self.filter_transactions(user_id, &TransactionFilter::default().kind(kind))
            .await
    }

    /// Looks up one transaction of the user.
    pub async fn transaction(&self, user_id: &str, transaction_id: &str) -> ResultEngine<Transaction> {
        self.list_transactions(user_id)
            .await?
            .into_iter()
            .find(|tx| tx.id == transaction_id)
            .ok_or_else(EngineError::transaction_not_found)
    }

    /// Whether any transaction of the user is filed under `category_id`.
    pub async fn has_transactions(&self, user_id: &str, category_id: &str) -> ResultEngine<bool> {
        Ok(self
            .list_transactions(user_id)
            .await?
            .iter()
            .any(|tx| tx.category_id == category_id))
    }

    /// Validates and records a transaction. The category must belong to the
    /// same user.
    pub async fn create_transaction(
        &self,
        user_id: &str,
        input: &NewTransaction,
    ) -> ResultEngine<String> {
        let user_id = require_user_id(user_id)?;
        let valid = validate_new_transaction(input, self.today())?;
        self.category(user_id, &valid.category_id).await?;

        let doc = TransactionDoc {
            user_id: user_id.to_string(),
            amount_minor: valid.amount,
            date: valid.date,
            category_id: valid.category_id,
            description: valid.description,
            kind: valid.kind,
            payment_method: valid.payment_method,
            recurring: valid.recurring,
            recurrence_months: valid.recurrence_months,
        };
        let value = serde_json::to_value(&doc).map_err(StoreError::from)?;
        let id = self
            .store
            .put(Collection::Transactions, user_id, None, value)
            .await?;

        tracing::info!(
            "user {user_id} recorded {} {id} of {} on {}",
            doc.kind.as_str(),
            doc.amount_minor,
            doc.date
        );
        self.notify(user_id, ChangedEntity::Transaction, ChangeAction::Created, &id);
        Ok(id)
    }

    /// Applies a partial update. Every field but the id and the owner can
    /// change; only the fields present in the patch are validated.
    ///
    /// Recurrence months are accepted only when the transaction is recurring
    /// after the update. Turning recurrence off clears the stored months.
    pub async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
        patch: &TransactionPatch,
    ) -> ResultEngine<()> {
        let user_id = require_user_id(user_id)?;
        let valid = validate_transaction_patch(patch, self.today())?;
        let existing = self.transaction(user_id, transaction_id).await?;
        if patch.is_empty() {
            return Ok(());
        }
        if let Some(category_id) = &valid.category_id {
            self.category(user_id, category_id).await?;
        }

        let recurring = valid.recurring.unwrap_or(existing.recurring);
        if !recurring && valid.recurrence_months.is_some() {
            return Err(EngineError::validation(
                "recurrence months require a recurring transaction",
            ));
        }
        let touches_recurrence = valid.recurring.is_some() || valid.recurrence_months.is_some();
        let recurrence_months = if recurring {
            valid.recurrence_months.map(Some)
        } else if touches_recurrence {
            Some(None)
        } else {
            None
        };

        let doc = TransactionPatchDoc {
            amount_minor: valid.amount,
            date: valid.date,
            category_id: valid.category_id,
            description: valid.description,
            kind: valid.kind,
            payment_method: valid.payment_method,
            recurring: valid.recurring,
            recurrence_months,
        };
        let value = serde_json::to_value(&doc).map_err(StoreError::from)?;
        self.store
            .patch(
                &StoreKey::new(Collection::Transactions, user_id, transaction_id),
                value,
            )
            .await?;

        tracing::info!("user {user_id} updated transaction {transaction_id}");
        self.notify(
            user_id,
            ChangedEntity::Transaction,
            ChangeAction::Updated,
            transaction_id,
        );
        Ok(())
    }

    pub async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> ResultEngine<()> {
        let user_id = require_user_id(user_id)?;
        self.transaction(user_id, transaction_id).await?;

        self.store
            .delete(&StoreKey::new(
                Collection::Transactions,
                user_id,
                transaction_id,
            ))
            .await?;

        tracing::info!("user {user_id} deleted transaction {transaction_id}");
        self.notify(
            user_id,
            ChangedEntity::Transaction,
            ChangeAction::Deleted,
            transaction_id,
        );
        Ok(())
    }

    /// The `limit` most recent transactions, newest first.
    pub async fn recent_transactions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut transactions = self.list_transactions(user_id).await?;
        transactions.truncate(limit);
        Ok(transactions)
    }
}
