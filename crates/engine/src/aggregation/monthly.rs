use std::{cmp::Reverse, collections::BTreeMap};

use chrono::Datelike;
use serde::Serialize;

use crate::Transaction;

use super::{Summary, summarize};

/// Transactions of one calendar month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGroup {
    pub year: i32,
    pub month: u32,
    /// e.g. "January 2024".
    pub label: String,
    /// Kept in input order.
    pub transactions: Vec<Transaction>,
}

impl MonthGroup {
    /// Newest first; ties keep input order.
    pub fn sort_by_date_desc(&mut self) {
        self.transactions.sort_by_key(|tx| Reverse(tx.date));
    }

    pub fn summary(&self) -> Summary {
        summarize(&self.transactions)
    }
}

/// Partitions transactions by `(year, month)` of their date, most recent month
/// first. Every transaction lands in exactly one group.
pub fn group_by_month(transactions: &[Transaction]) -> Vec<MonthGroup> {
    let mut months: BTreeMap<(i32, u32), Vec<Transaction>> = BTreeMap::new();
    for tx in transactions {
        months
            .entry((tx.date.year(), tx.date.month()))
            .or_default()
            .push(tx.clone());
    }

    months
        .into_iter()
        .rev()
        .map(|((year, month), transactions)| MonthGroup {
            year,
            month,
            label: format!("{} {year}", month_name(month)),
            transactions,
        })
        .collect()
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
