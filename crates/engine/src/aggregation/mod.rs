//! Derived views over a transaction sequence.
//!
//! Everything here is a pure function of its inputs: no store access, no
//! system clock. Callers pass "today" explicitly.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::{MoneyCents, Transaction, TransactionFilter, TransactionKind};

mod breakdown;
mod budget;
mod monthly;
mod recurring;
mod series;

pub use breakdown::{CategoryTotals, category_breakdown};
pub use budget::{BudgetUsage, budget_usage};
pub use monthly::{MonthGroup, group_by_month, month_name};
pub use recurring::{Occurrence, occurrence_dates, upcoming_occurrences};
pub use series::{DEFAULT_SERIES_POINTS, SeriesPoint, running_balance, running_balance_from};

/// Balance summary of a transaction sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub balance: MoneyCents,
    pub income_total: MoneyCents,
    pub expense_total: MoneyCents,
    pub transaction_count: usize,
}

/// Income total, expense total and their difference. Zeros for an empty
/// sequence.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut summary = Summary::default();
    for tx in transactions {
        match tx.kind {
            TransactionKind::Income => summary.income_total += tx.amount,
            TransactionKind::Expense => summary.expense_total += tx.amount,
        }
    }
    summary.balance = summary.income_total - summary.expense_total;
    summary.transaction_count = transactions.len();
    summary
}

/// Lower date bound applied before aggregating.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    #[default]
    AllTime,
    /// Transactions dated on or after `today - n days`.
    LastDays(u32),
}

impl Period {
    /// Day count that stands for "all time" in configuration and user input.
    pub const ALL_TIME_DAYS: i64 = -1;

    /// Any negative count means all time.
    pub fn from_days(days: i64) -> Self {
        if days < 0 {
            Self::AllTime
        } else {
            Self::LastDays(u32::try_from(days).unwrap_or(u32::MAX))
        }
    }

    pub fn start_date(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::AllTime => None,
            Self::LastDays(days) => Some(
                today
                    .checked_sub_days(Days::new(u64::from(days)))
                    .unwrap_or(NaiveDate::MIN),
            ),
        }
    }
}

/// Period cutoff plus optional kind, composed in front of any aggregation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeriodFilter {
    pub period: Period,
    pub kind: Option<TransactionKind>,
}

impl PeriodFilter {
    pub fn new(period: Period) -> Self {
        Self { period, kind: None }
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn to_filter(self, today: NaiveDate) -> TransactionFilter {
        TransactionFilter {
            start_date: self.period.start_date(today),
            end_date: None,
            category_id: None,
            kind: self.kind,
        }
    }

    pub fn apply(self, transactions: &[Transaction], today: NaiveDate) -> Vec<Transaction> {
        self.to_filter(today).apply(transactions)
    }

    /// Net of the matching transactions dated before the cutoff. Zero for
    /// [`Period::AllTime`].
    pub fn opening_balance(self, transactions: &[Transaction], today: NaiveDate) -> MoneyCents {
        let Some(start) = self.period.start_date(today) else {
            return MoneyCents::ZERO;
        };
        transactions
            .iter()
            .filter(|tx| tx.date < start && self.kind.is_none_or(|kind| tx.kind == kind))
            .map(Transaction::signed_amount)
            .sum()
    }
}
