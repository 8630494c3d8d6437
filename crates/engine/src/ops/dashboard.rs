use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    Category, Identity, ResultEngine, Transaction, TransactionKind,
    aggregation::{
        BudgetUsage, CategoryTotals, DEFAULT_SERIES_POINTS, MonthGroup, Occurrence, Period,
        PeriodFilter, SeriesPoint, Summary, budget_usage, category_breakdown, group_by_month,
        running_balance_from, summarize, upcoming_occurrences,
    },
};

use super::{BootstrapOutcome, Engine, require_user_id};

/// Recent transactions shown by default.
pub const RECENT_LIMIT: usize = 10;
/// Look-ahead window for recurring occurrences, in days.
pub const UPCOMING_DAYS: u32 = 30;

/// Knobs of [`Engine::dashboard`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DashboardOptions {
    /// Applied to the period summary, monthly groups, breakdown and series.
    /// The series starts from the net of the transactions before the cutoff.
    pub period: Period,
    pub kind: Option<TransactionKind>,
    pub recent_limit: usize,
    pub series_points: usize,
    pub upcoming_days: u32,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            period: Period::AllTime,
            kind: None,
            recent_limit: RECENT_LIMIT,
            series_points: DEFAULT_SERIES_POINTS,
            upcoming_days: UPCOMING_DAYS,
        }
    }
}

impl DashboardOptions {
    #[must_use]
    pub fn period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    #[must_use]
    pub fn series_points(mut self, points: usize) -> Self {
        self.series_points = points;
        self
    }

    #[must_use]
    pub fn upcoming_days(mut self, days: u32) -> Self {
        self.upcoming_days = days;
        self
    }

    fn period_filter(&self) -> PeriodFilter {
        PeriodFilter {
            period: self.period,
            kind: self.kind,
        }
    }
}

/// Everything the overview screen shows, computed from one snapshot of the
/// user's data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user_id: String,
    pub generated_on: NaiveDate,
    /// Over every transaction, regardless of the period.
    pub summary: Summary,
    pub period_summary: Summary,
    pub recent: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub monthly: Vec<MonthGroup>,
    pub breakdown: Vec<CategoryTotals>,
    pub balance_series: Vec<SeriesPoint>,
    pub budgets: Vec<BudgetUsage>,
    pub upcoming: Vec<Occurrence>,
    /// Set when this call created the default categories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<BootstrapOutcome>,
}

impl Engine {
    /// Composes the dashboard of `user_id`.
    ///
    /// Transactions and categories are fetched concurrently; the first failing
    /// read fails the whole call. A user without categories gets the default
    /// catalog first.
    pub async fn dashboard(
        &self,
        user_id: &str,
        options: &DashboardOptions,
    ) -> ResultEngine<Dashboard> {
        let user_id = require_user_id(user_id)?;
        let today = self.today();

        let (transactions, mut categories) = tokio::try_join!(
            self.list_transactions(user_id),
            self.list_categories(user_id)
        )?;

        let mut bootstrap = None;
        if categories.is_empty() {
            let outcome = self.bootstrap_default_categories(user_id).await?;
            if outcome.created() > 0 {
                categories = self.list_categories(user_id).await?;
            }
            bootstrap = Some(outcome);
        }

        let filter = options.period_filter();
        let scoped = filter.apply(&transactions, today);
        let opening = filter.opening_balance(&transactions, today);
        let mut monthly = group_by_month(&scoped);
        for group in &mut monthly {
            group.sort_by_date_desc();
        }

        let recent = transactions
            .iter()
            .take(options.recent_limit)
            .cloned()
            .collect();

        let dashboard = Dashboard {
            user_id: user_id.to_string(),
            generated_on: today,
            summary: summarize(&transactions),
            period_summary: summarize(&scoped),
            recent,
            monthly,
            breakdown: category_breakdown(&scoped),
            balance_series: running_balance_from(&scoped, opening, today, options.series_points),
            budgets: budget_usage(&categories, &transactions, today),
            upcoming: upcoming_occurrences(&transactions, today, options.upcoming_days),
            categories,
            bootstrap,
        };

        tracing::debug!(
            "dashboard for {user_id}: {} transactions, {} categories, balance {}",
            dashboard.summary.transaction_count,
            dashboard.categories.len(),
            dashboard.summary.balance
        );
        Ok(dashboard)
    }

    /// [`dashboard`](Self::dashboard) for whoever is signed in.
    pub async fn dashboard_for(
        &self,
        identity: &dyn Identity,
        options: &DashboardOptions,
    ) -> ResultEngine<Dashboard> {
        let user_id = identity.require_user_id()?;
        self.dashboard(&user_id, options).await
    }
}
