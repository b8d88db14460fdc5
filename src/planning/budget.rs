use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::currency::round_minor;
use crate::errors::{FinanceError, FinanceResult};

/// Half-open `[start, end)` range of dates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> FinanceResult<Self> {
        if end <= start {
            return Err(FinanceError::invalid("window end must be after start"));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn expense(
        description: impl Into<String>,
        category: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            category: category.into(),
            amount,
            date,
            kind: TransactionKind::Expense,
        }
    }

    pub fn income(
        description: impl Into<String>,
        category: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            category: category.into(),
            amount,
            date,
            kind: TransactionKind::Income,
        }
    }
}

/// Spending limit for one category over the summarized window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryBudget {
    pub category: String,
    pub limit: Decimal,
}

impl CategoryBudget {
    pub fn new(category: impl Into<String>, limit: Decimal) -> Self {
        Self {
            category: category.into(),
            limit,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BudgetStatus {
    UnderBudget,
    NearLimit,
    OverBudget,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetStatus::UnderBudget => "Under Budget",
            BudgetStatus::NearLimit => "Near Limit",
            BudgetStatus::OverBudget => "Over Budget",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BudgetUsage {
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
    /// Negative once the limit is exceeded.
    pub remaining: Decimal,
    pub percent_used: Decimal,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
    pub savings_rate_percent: Decimal,
}

/// Measures expense transactions inside `window` against each category budget.
///
/// Categories match case-insensitively. `warning_percent` is the utilisation at
/// which a budget turns [`BudgetStatus::NearLimit`].
pub fn summarize_budgets(
    budgets: &[CategoryBudget],
    transactions: &[Transaction],
    window: DateWindow,
    warning_percent: Decimal,
) -> Vec<BudgetUsage> {
    let mut spent_by_category: BTreeMap<String, Decimal> = BTreeMap::new();
    for txn in transactions
        .iter()
        .filter(|txn| txn.kind == TransactionKind::Expense && window.contains(txn.date))
    {
        *spent_by_category
            .entry(txn.category.to_lowercase())
            .or_default() += txn.amount;
    }

    budgets
        .iter()
        .map(|budget| {
            let spent = spent_by_category
                .get(&budget.category.to_lowercase())
                .copied()
                .unwrap_or_default();
            let percent_used = if budget.limit > Decimal::ZERO {
                percent_of(spent, budget.limit).unwrap_or(Decimal::MAX)
            } else if spent > Decimal::ZERO {
                dec!(100)
            } else {
                Decimal::ZERO
            };
            let status = if spent > budget.limit {
                BudgetStatus::OverBudget
            } else if budget.limit > Decimal::ZERO && percent_used >= warning_percent {
                BudgetStatus::NearLimit
            } else {
                BudgetStatus::UnderBudget
            };
            debug!(category = %budget.category, %spent, %status, "budget usage");
            BudgetUsage {
                category: budget.category.clone(),
                limit: budget.limit,
                spent,
                remaining: budget.limit - spent,
                percent_used,
                status,
            }
        })
        .collect()
}

pub fn dashboard_stats(transactions: &[Transaction], window: DateWindow) -> DashboardStats {
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    for txn in transactions.iter().filter(|txn| window.contains(txn.date)) {
        match txn.kind {
            TransactionKind::Income => income += txn.amount,
            TransactionKind::Expense => expenses += txn.amount,
        }
    }
    let net = income - expenses;
    // Only a large deficit over a tiny income can overflow.
    let savings_rate_percent = if income > Decimal::ZERO {
        percent_of(net, income).unwrap_or(Decimal::MIN)
    } else {
        Decimal::ZERO
    };
    DashboardStats {
        income,
        expenses,
        net,
        savings_rate_percent,
    }
}

/// `part / whole` as a percentage rounded to the minor unit; `None` past the `Decimal` range.
fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .map(round_minor)
}
