use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::{MoneyCents, Transaction};

/// Point budget used by the dashboard chart.
pub const DEFAULT_SERIES_POINTS: usize = 30;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub label: String,
    /// Cumulative balance at the end of `date`.
    pub value: MoneyCents,
}

/// Day-by-day running balance from the first transaction date through `today`.
///
/// Days without activity carry the previous balance forward. When the range
/// spans more than `max_points` days the series keeps every Nth day with
/// `N = ceil(days / max_points)`; the last day (`today`) is always present and
/// the series never exceeds `max_points`. `max_points == 0` disables
/// down-sampling.
///
/// Transactions dated after `today` are ignored. The input order does not
/// matter.
pub fn running_balance(
    transactions: &[Transaction],
    today: NaiveDate,
    max_points: usize,
) -> Vec<SeriesPoint> {
    running_balance_from(transactions, MoneyCents::ZERO, today, max_points)
}

/// [`running_balance`] starting at `opening` instead of zero, for a window
/// that does not begin with the user's first transaction.
pub fn running_balance_from(
    transactions: &[Transaction],
    opening: MoneyCents,
    today: NaiveDate,
    max_points: usize,
) -> Vec<SeriesPoint> {
    let mut daily: BTreeMap<NaiveDate, MoneyCents> = BTreeMap::new();
    for tx in transactions.iter().filter(|tx| tx.date <= today) {
        *daily.entry(tx.date).or_default() += tx.signed_amount();
    }
    let Some(&first) = daily.keys().next() else {
        return Vec::new();
    };

    let mut points = Vec::new();
    let mut balance = opening;
    let mut day = first;
    loop {
        if let Some(net) = daily.get(&day) {
            balance += *net;
        }
        points.push(SeriesPoint {
            date: day,
            label: day.format("%Y-%m-%d").to_string(),
            value: balance,
        });
        if day >= today {
            break;
        }
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }

    downsample(points, max_points)
}

fn downsample(points: Vec<SeriesPoint>, max_points: usize) -> Vec<SeriesPoint> {
    let total = points.len();
    if max_points == 0 || total <= max_points {
        return points;
    }

    let stride = total.div_ceil(max_points);
    let last_index = total - 1;
    let mut sampled: Vec<SeriesPoint> = Vec::with_capacity(max_points);
    let mut last = None;
    for (i, point) in points.into_iter().enumerate() {
        if i % stride == 0 {
            sampled.push(point);
        } else if i == last_index {
            last = Some(point);
        }
    }

    if let Some(last) = last {
        if sampled.len() >= max_points {
            sampled.pop();
        }
        sampled.push(last);
    }
    sampled
}
