use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::{MoneyCents, TransactionKind};

use crate::settings::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(name = "ledgerly")]
#[command(about = "Track personal income and expenses")]
pub struct Cli {
    /// Settings file (TOML), without extension.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Override the log level.
    #[arg(long)]
    pub level: Option<String>,

    /// `memory` or a sqlite file path.
    #[arg(long)]
    pub database: Option<String>,

    /// Act as this user id instead of the configured one.
    #[arg(long)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List categories.
    Categories,
    /// Create a category.
    AddCategory(AddCategoryArgs),
    /// Delete a category nothing refers to.
    DeleteCategory { id: String },
    /// Create the default categories for a user who has none.
    Bootstrap,
    /// Record a transaction.
    Add(AddArgs),
    /// Delete a transaction.
    Delete { id: String },
    /// List transactions, newest first.
    List(ListArgs),
    /// Print the dashboard.
    Dashboard(DashboardArgs),
}

#[derive(Args, Debug)]
pub struct AddCategoryArgs {
    pub name: String,
    pub description: String,
    #[arg(long, default_value = "#607d8b")]
    pub color: String,
    /// Monthly spending limit, e.g. `250.00`.
    #[arg(long)]
    pub limit: Option<MoneyCents>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(value_parser = parse_kind)]
    pub kind: TransactionKind,
    /// Amount, e.g. `12.50` or `12,50`.
    pub amount: MoneyCents,
    /// Category id.
    pub category: String,
    pub description: String,
    /// `YYYY-MM-DD`; defaults to today.
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub payment_method: Option<String>,
    #[arg(long)]
    pub recurring: bool,
    /// Number of monthly repetitions; open-ended when omitted.
    #[arg(long, requires = "recurring")]
    pub months: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub from: Option<NaiveDate>,
    #[arg(long)]
    pub to: Option<NaiveDate>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<TransactionKind>,
}

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Only the last N days; `-1` for all time.
    #[arg(long, allow_hyphen_values = true)]
    pub days: Option<i64>,
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<TransactionKind>,
}

fn parse_kind(value: &str) -> Result<TransactionKind, String> {
    TransactionKind::try_from(value).map_err(|err| err.to_string())
}
