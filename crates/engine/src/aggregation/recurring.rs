use chrono::{Days, Months, NaiveDate};
use serde::Serialize;

use crate::{MoneyCents, Transaction, TransactionKind};

/// A future repetition of a recurring transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub transaction_id: String,
    pub description: String,
    pub category_id: String,
    pub kind: TransactionKind,
    pub amount: MoneyCents,
    pub date: NaiveDate,
}

/// Monthly repetitions of `tx` after its own date, up to and including `until`.
///
/// Repetition `k` falls `k` months after the original date, clamped to the end
/// of shorter months (Jan 31 -> Feb 29 -> Mar 31). A transaction with
/// `recurrence_months = Some(n)` repeats `n` times; `None` repeats without end.
pub fn occurrence_dates(tx: &Transaction, until: NaiveDate) -> Vec<NaiveDate> {
    if !tx.recurring {
        return Vec::new();
    }
    let limit = tx.recurrence_months.unwrap_or(u32::MAX);

    let mut dates = Vec::new();
    for k in 1..=limit {
        let Some(date) = tx.date.checked_add_months(Months::new(k)) else {
            break;
        };
        if date > until {
            break;
        }
        dates.push(date);
    }
    dates
}

/// Repetitions falling in `(today, today + horizon_days]`, soonest first.
pub fn upcoming_occurrences(
    transactions: &[Transaction],
    today: NaiveDate,
    horizon_days: u32,
) -> Vec<Occurrence> {
    let until = today
        .checked_add_days(Days::new(u64::from(horizon_days)))
        .unwrap_or(NaiveDate::MAX);

    let mut upcoming: Vec<Occurrence> = transactions
        .iter()
        .flat_map(|tx| {
            occurrence_dates(tx, until)
                .into_iter()
                .filter(move |date| *date > today)
                .map(move |date| Occurrence {
                    transaction_id: tx.id.clone(),
                    description: tx.description.clone(),
                    category_id: tx.category_id.clone(),
                    kind: tx.kind,
                    amount: tx.amount,
                    date,
                })
        })
        .collect();
    upcoming.sort_by_key(|occurrence| occurrence.date);
    upcoming
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    fn recurring(mut tx: Transaction, months: Option<u32>) -> Transaction {
        tx.recurring = true;
        tx.recurrence_months = months;
        tx
    }

    #[test]
    fn clamps_to_month_end_without_drift() {
        let tx = recurring(expense("a", 100, "2024-01-31", "c1"), Some(3));
        let dates = occurrence_dates(&tx, date("2030-01-01"));
        assert_eq!(
            dates,
            vec![date("2024-02-29"), date("2024-03-31"), date("2024-04-30")]
        );
    }

    #[test]
    fn open_ended_stops_at_until() {
        let tx = recurring(income("a", 100, "2024-01-10", "c1"), None);
        assert_eq!(occurrence_dates(&tx, date("2024-04-09")).len(), 2);
    }

    #[test]
    fn non_recurring_has_no_occurrences() {
        let tx = expense("a", 100, "2024-01-10", "c1");
        assert!(occurrence_dates(&tx, date("2030-01-01")).is_empty());
    }

    #[test]
    fn upcoming_window_is_sorted_and_exclusive_of_today() {
        let txs = vec![
            recurring(expense("rent", 1000, "2024-01-20", "home"), None),
            recurring(income("salary", 5000, "2024-01-05", "job"), Some(12)),
            expense("once", 10, "2024-03-01", "food"),
        ];
        let upcoming = upcoming_occurrences(&txs, date("2024-03-05"), 31);
        let got: Vec<_> = upcoming
            .iter()
            .map(|o| (o.transaction_id.as_str(), o.date))
            .collect();
        assert_eq!(
            got,
            vec![("rent", date("2024-03-20")), ("salary", date("2024-04-05"))]
        );
    }
}
