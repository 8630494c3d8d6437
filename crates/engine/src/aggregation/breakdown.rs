use std::{cmp::Reverse, collections::HashMap};

use serde::Serialize;

use crate::{MoneyCents, Transaction, TransactionKind};

/// Per-category totals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotals {
    pub category_id: String,
    pub income: MoneyCents,
    pub expense: MoneyCents,
    /// `income - expense`.
    pub net: MoneyCents,
    pub count: usize,
}

/// Groups by category and sorts by `|net|` descending so the most significant
/// categories come first. Ties keep first-encountered order.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotals> {
    let mut rows: Vec<CategoryTotals> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tx in transactions {
        let slot = *index.entry(tx.category_id.as_str()).or_insert_with(|| {
            rows.push(CategoryTotals {
                category_id: tx.category_id.clone(),
                income: MoneyCents::ZERO,
                expense: MoneyCents::ZERO,
                net: MoneyCents::ZERO,
                count: 0,
            });
            rows.len() - 1
        });

        let row = &mut rows[slot];
        match tx.kind {
            TransactionKind::Income => row.income += tx.amount,
            TransactionKind::Expense => row.expense += tx.amount,
        }
        row.count += 1;
    }

    for row in &mut rows {
        row.net = row.income - row.expense;
    }
    // Stable sort: equal magnitudes stay in encounter order.
    rows.sort_by_key(|row| Reverse(row.net.abs()));
    rows
}
