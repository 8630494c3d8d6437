//! Field rules for transactions and categories.
//!
//! Every check runs in a fixed order and the first failure wins:
//!
//! 1. required strings are not empty
//! 2. length bounds
//! 3. numeric bounds
//! 4. color format
//! 5. transaction kind
//! 6. transaction date (parsable, not in the future, at most 10 years old)
//!
//! Patch validators apply the same order to the fields present in the patch and
//! ignore the rest. The validators are pure; "today" is always a parameter.

use chrono::{Months, NaiveDate};

use crate::{
    CategoryPatch, EngineError, MoneyCents, NewCategory, NewTransaction, ResultEngine,
    TransactionKind, TransactionPatch,
};

/// Upper bound for a transaction amount (inclusive).
pub const MAX_AMOUNT: MoneyCents = MoneyCents::from_units(1_000_000);
/// Upper bound for a category spending limit (inclusive).
pub const MAX_SPENDING_LIMIT: MoneyCents = MoneyCents::from_units(1_000_000);
/// How far back a transaction date may go.
pub const MAX_HISTORY_MONTHS: u32 = 12 * 10;

pub const DESCRIPTION_LEN: (usize, usize) = (3, 100);
pub const CATEGORY_NAME_LEN: (usize, usize) = (2, 30);

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A transaction whose fields passed every rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidTransaction {
    pub amount: MoneyCents,
    pub date: NaiveDate,
    pub category_id: String,
    pub description: String,
    pub kind: TransactionKind,
    pub payment_method: String,
    pub recurring: bool,
    pub recurrence_months: Option<u32>,
}

/// The validated subset of a [`TransactionPatch`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidTransactionPatch {
    pub amount: Option<MoneyCents>,
    pub date: Option<NaiveDate>,
    pub category_id: Option<String>,
    pub description: Option<String>,
    pub kind: Option<TransactionKind>,
    pub payment_method: Option<String>,
    pub recurring: Option<bool>,
    pub recurrence_months: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidCategory {
    pub name: String,
    pub description: String,
    pub color: String,
    pub spending_limit: Option<MoneyCents>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidCategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    /// `Some(None)` removes the limit.
    pub spending_limit: Option<Option<MoneyCents>>,
}

pub fn validate_new_transaction(
    input: &NewTransaction,
    today: NaiveDate,
) -> ResultEngine<ValidTransaction> {
    let description = require_non_empty(&input.description, "description")?;
    let date = require_non_empty(&input.date, "date")?;
    let category_id = require_non_empty(&input.category_id, "category")?;
    let kind = require_non_empty(&input.kind, "kind")?;

    check_length(description, "description", DESCRIPTION_LEN)?;
    check_amount(input.amount)?;
    let kind = TransactionKind::try_from(kind)?;
    let date = parse_date(date, today)?;
    let recurrence_months = check_recurrence(input.recurring, input.recurrence_months)?;

    Ok(ValidTransaction {
        amount: input.amount,
        date,
        category_id: category_id.to_string(),
        description: description.to_string(),
        kind,
        payment_method: input.payment_method.trim().to_string(),
        recurring: input.recurring,
        recurrence_months,
    })
}

pub fn validate_transaction_patch(
    patch: &TransactionPatch,
    today: NaiveDate,
) -> ResultEngine<ValidTransactionPatch> {
    let description = patch
        .description
        .as_deref()
        .map(|v| require_non_empty(v, "description"))
        .transpose()?;
    let date = patch
        .date
        .as_deref()
        .map(|v| require_non_empty(v, "date"))
        .transpose()?;
    let category_id = patch
        .category_id
        .as_deref()
        .map(|v| require_non_empty(v, "category"))
        .transpose()?;
    let kind = patch
        .kind
        .as_deref()
        .map(|v| require_non_empty(v, "kind"))
        .transpose()?;

    if let Some(description) = description {
        check_length(description, "description", DESCRIPTION_LEN)?;
    }
    if let Some(amount) = patch.amount {
        check_amount(amount)?;
    }
    let kind = kind.map(TransactionKind::try_from).transpose()?;
    let date = date.map(|d| parse_date(d, today)).transpose()?;
    if let Some(months) = patch.recurrence_months {
        check_recurrence(true, Some(months))?;
    }

    Ok(ValidTransactionPatch {
        amount: patch.amount,
        date,
        category_id: category_id.map(ToString::to_string),
        description: description.map(ToString::to_string),
        kind,
        payment_method: patch.payment_method.as_deref().map(|m| m.trim().to_string()),
        recurring: patch.recurring,
        recurrence_months: patch.recurrence_months,
    })
}

pub fn validate_new_category(input: &NewCategory) -> ResultEngine<ValidCategory> {
    let name = require_non_empty(&input.name, "name")?;
    let description = require_non_empty(&input.description, "description")?;
    let color = require_non_empty(&input.color, "color")?;

    check_length(name, "name", CATEGORY_NAME_LEN)?;
    check_length(description, "description", DESCRIPTION_LEN)?;
    if let Some(limit) = input.spending_limit {
        check_spending_limit(limit)?;
    }
    check_color(color)?;

    Ok(ValidCategory {
        name: collapse_whitespace(name),
        description: description.to_string(),
        color: color.to_string(),
        spending_limit: input.spending_limit,
    })
}

pub fn validate_category_patch(patch: &CategoryPatch) -> ResultEngine<ValidCategoryPatch> {
    let name = patch
        .name
        .as_deref()
        .map(|v| require_non_empty(v, "name"))
        .transpose()?;
    let description = patch
        .description
        .as_deref()
        .map(|v| require_non_empty(v, "description"))
        .transpose()?;
    let color = patch
        .color
        .as_deref()
        .map(|v| require_non_empty(v, "color"))
        .transpose()?;

    if let Some(name) = name {
        check_length(name, "name", CATEGORY_NAME_LEN)?;
    }
    if let Some(description) = description {
        check_length(description, "description", DESCRIPTION_LEN)?;
    }
    if let Some(Some(limit)) = patch.spending_limit {
        check_spending_limit(limit)?;
    }
    if let Some(color) = color {
        check_color(color)?;
    }

    Ok(ValidCategoryPatch {
        name: name.map(collapse_whitespace),
        description: description.map(ToString::to_string),
        color: color.map(ToString::to_string),
        spending_limit: patch.spending_limit,
    })
}

/// Parses a `YYYY-MM-DD` date and checks it lies in `[today - 10 years, today]`.
pub fn parse_date(value: &str, today: NaiveDate) -> ResultEngine<NaiveDate> {
    let date = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        EngineError::validation("date must be a valid calendar date in YYYY-MM-DD format")
    })?;
    if date > today {
        return Err(EngineError::validation("date cannot be in the future"));
    }
    let oldest = today
        .checked_sub_months(Months::new(MAX_HISTORY_MONTHS))
        .unwrap_or(NaiveDate::MIN);
    if date < oldest {
        return Err(EngineError::validation(
            "date cannot be more than 10 years in the past",
        ));
    }
    Ok(date)
}

fn require_non_empty<'a>(value: &'a str, field: &str) -> ResultEngine<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

fn check_length(value: &str, field: &str, (min, max): (usize, usize)) -> ResultEngine<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(EngineError::validation(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

fn check_amount(amount: MoneyCents) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::validation("amount must be greater than zero"));
    }
    if amount > MAX_AMOUNT {
        return Err(EngineError::validation(format!(
            "amount must not exceed {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

fn check_spending_limit(limit: MoneyCents) -> ResultEngine<()> {
    if limit.is_negative() || limit > MAX_SPENDING_LIMIT {
        return Err(EngineError::validation(format!(
            "spending limit must be between 0.00 and {MAX_SPENDING_LIMIT}"
        )));
    }
    Ok(())
}

/// `#` followed by 3 or 6 hex digits.
fn check_color(color: &str) -> ResultEngine<()> {
    let valid = color.strip_prefix('#').is_some_and(|digits| {
        matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
    });
    if !valid {
        return Err(EngineError::validation(
            "color must be a hex color such as #abc or #a1b2c3",
        ));
    }
    Ok(())
}

fn check_recurrence(recurring: bool, months: Option<u32>) -> ResultEngine<Option<u32>> {
    match (recurring, months) {
        (true, Some(0)) => Err(EngineError::validation(
            "recurrence months must be at least 1",
        )),
        (true, months) => Ok(months),
        (false, _) => Ok(None),
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
