use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{Category, MoneyCents, Transaction, TransactionKind};

/// Spending against a category's limit in the month of `today`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUsage {
    pub category_id: String,
    pub name: String,
    pub limit: MoneyCents,
    pub spent: MoneyCents,
    /// Negative once the limit is exceeded.
    pub remaining: MoneyCents,
    /// `None` for a zero limit.
    pub used_percent: Option<u32>,
    pub over_limit: bool,
}

/// One row per category that has a spending limit, in category order. Limits
/// are informational: nothing is rejected for exceeding them.
pub fn budget_usage(
    categories: &[Category],
    transactions: &[Transaction],
    today: NaiveDate,
) -> Vec<BudgetUsage> {
    let in_month = |tx: &&Transaction| {
        tx.kind == TransactionKind::Expense
            && tx.date.year() == today.year()
            && tx.date.month() == today.month()
    };

    categories
        .iter()
        .filter_map(|category| {
            let limit = category.spending_limit?;
            let spent: MoneyCents = transactions
                .iter()
                .filter(&in_month)
                .filter(|tx| tx.category_id == category.id)
                .map(|tx| tx.amount)
                .sum();
            let used_percent = (!limit.is_zero()).then(|| {
                let percent = spent.cents().saturating_mul(100) / limit.cents();
                u32::try_from(percent).unwrap_or(u32::MAX)
            });
            Some(BudgetUsage {
                category_id: category.id.clone(),
                name: category.name.clone(),
                limit,
                spent,
                remaining: limit - spent,
                used_percent,
                over_limit: spent > limit,
            })
        })
        .collect()
}
