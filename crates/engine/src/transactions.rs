//! Transaction primitives.
//!
//! A `Transaction` is a single income or expense owned by one user and filed
//! under one of that user's categories.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, store::StoreError};

/// Suggested payment methods. Free-form values are accepted as well.
pub const PAYMENT_METHODS: &[&str] = &[
    "cash",
    "debit_card",
    "credit_card",
    "pix",
    "bank_transfer",
    "other",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(EngineError::validation(
                "kind must be either income or expense",
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub amount: MoneyCents,
    pub date: NaiveDate,
    pub category_id: String,
    pub description: String,
    pub kind: TransactionKind,
    pub payment_method: String,
    pub recurring: bool,
    pub recurrence_months: Option<u32>,
}

impl Transaction {
    /// Amount with the sign implied by the kind: income adds, expense subtracts.
    pub fn signed_amount(&self) -> MoneyCents {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    pub(crate) fn from_document(id: String, value: serde_json::Value) -> Result<Self, StoreError> {
        let doc: TransactionDoc = serde_json::from_value(value)?;
        Ok(Self {
            id,
            user_id: doc.user_id,
            amount: doc.amount_minor,
            date: doc.date,
            category_id: doc.category_id,
            description: doc.description,
            kind: doc.kind,
            payment_method: doc.payment_method,
            recurring: doc.recurring,
            recurrence_months: doc.recurrence_months,
        })
    }
}

/// Raw input for a new transaction, as it arrives from a form.
///
/// `date` and `kind` stay textual until validation parses them.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTransaction {
    pub amount: MoneyCents,
    pub date: String,
    pub category_id: String,
    pub description: String,
    pub kind: String,
    pub payment_method: String,
    pub recurring: bool,
    pub recurrence_months: Option<u32>,
}

impl NewTransaction {
    #[must_use]
    pub fn new(
        kind: TransactionKind,
        amount: MoneyCents,
        date: impl Into<String>,
        category_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            date: date.into(),
            category_id: category_id.into(),
            description: description.into(),
            kind: kind.as_str().to_string(),
            payment_method: String::new(),
            recurring: false,
            recurrence_months: None,
        }
    }

    #[must_use]
    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = method.into();
        self
    }

    #[must_use]
    pub fn recurring(mut self, months: Option<u32>) -> Self {
        self.recurring = true;
        self.recurrence_months = months;
        self
    }
}

/// Partial update of a transaction. Only the fields that are `Some` are
/// validated and written.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionPatch {
    pub amount: Option<MoneyCents>,
    pub date: Option<String>,
    pub category_id: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub payment_method: Option<String>,
    pub recurring: Option<bool>,
    pub recurrence_months: Option<u32>,
}

impl TransactionPatch {
    #[must_use]
    pub fn amount(mut self, amount: MoneyCents) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind.as_str().to_string());
        self
    }

    #[must_use]
    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    #[must_use]
    pub fn recurring(mut self, recurring: bool) -> Self {
        self.recurring = Some(recurring);
        self
    }

    #[must_use]
    pub fn recurrence_months(mut self, months: u32) -> Self {
        self.recurrence_months = Some(months);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.date.is_none()
            && self.category_id.is_none()
            && self.description.is_none()
            && self.kind.is_none()
            && self.payment_method.is_none()
            && self.recurring.is_none()
            && self.recurrence_months.is_none()
    }
}

/// Stored shape of a transaction. The identifier lives in the key.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransactionDoc {
    pub(crate) user_id: String,
    pub(crate) amount_minor: MoneyCents,
    pub(crate) date: NaiveDate,
    pub(crate) category_id: String,
    pub(crate) description: String,
    pub(crate) kind: TransactionKind,
    #[serde(default)]
    pub(crate) payment_method: String,
    #[serde(default)]
    pub(crate) recurring: bool,
    #[serde(default)]
    pub(crate) recurrence_months: Option<u32>,
}

/// Stored shape of a partial update: absent fields are left untouched.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransactionPatchDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) amount_minor: Option<MoneyCents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) kind: Option<TransactionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) recurring: Option<bool>,
    /// `Some(None)` clears the stored value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) recurrence_months: Option<Option<u32>>,
}

/// Filters for listing transactions. All present predicates must match.
///
/// Both `start_date` and `end_date` are inclusive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category_id: Option<String>,
    pub kind: Option<TransactionKind>,
}

impl TransactionFilter {
    #[must_use]
    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    #[must_use]
    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.start_date.is_none_or(|start| tx.date >= start)
            && self.end_date.is_none_or(|end| tx.date <= end)
            && self
                .category_id
                .as_deref()
                .is_none_or(|id| tx.category_id == id)
            && self.kind.is_none_or(|kind| tx.kind == kind)
    }

    /// Returns the matching transactions in their original order.
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|tx| self.matches(tx))
            .cloned()
            .collect()
    }
}
