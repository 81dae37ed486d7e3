//! Dashboard statistics: totals, month-over-month deltas and the expense
//! breakdown by category.
//!
//! Everything is recomputed from the snapshot on each call. The input order is
//! significant for [`DerivedStatistics::recent`] only; callers that want the
//! newest records there must sort before aggregating.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::filter::{contributes, sum_by_type, sum_in_month};
use crate::period::YearMonth;
use crate::transaction::{Transaction, TransactionType};

/// Number of leading records reported as recent
pub const DEFAULT_RECENT_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AggregateOptions {
    pub recent_count: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            recent_count: DEFAULT_RECENT_COUNT,
        }
    }
}

/// Income and expense inside one calendar month
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PeriodTotals {
    pub period: YearMonth,
    pub income: f64,
    pub expense: f64,
}

impl PeriodTotals {
    pub fn compute(txns: &[Transaction], period: YearMonth) -> Self {
        Self {
            period,
            income: sum_in_month(txns, TransactionType::Income, period),
            expense: sum_in_month(txns, TransactionType::Expense, period),
        }
    }

    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

/// One decimal place; a result that rounds to zero is always `0.0`, never `-0.0`.
fn round1(value: f64) -> f64 {
    let r = (value * 10.0).round() / 10.0;
    if r == 0.0 { 0.0 } else { r }
}

/// `amount` as a percentage of `total`, one decimal. `None` when `total` is zero.
pub fn share_of(amount: f64, total: f64) -> Option<f64> {
    if total == 0.0 || !total.is_finite() {
        return None;
    }
    Some(round1(amount / total * 100.0))
}

/// Month-over-month change of a total
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "percent", rename_all = "snake_case")]
pub enum PercentChange {
    /// Previous period total was zero
    NoBaseline,
    /// Percentage rounded to one decimal
    Change(f64),
}

impl PercentChange {
    pub fn between(current: f64, previous: f64) -> Self {
        if previous == 0.0 {
            return PercentChange::NoBaseline;
        }
        let pct = (current - previous) / previous * 100.0;
        PercentChange::Change(round1(pct))
    }

    pub fn percent(&self) -> Option<f64> {
        match self {
            PercentChange::NoBaseline => None,
            PercentChange::Change(p) => Some(*p),
        }
    }
}

impl fmt::Display for PercentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentChange::NoBaseline => write!(f, "No data last month"),
            PercentChange::Change(p) => {
                let sign = if *p > 0.0 { "+" } else { "" };
                write!(f, "{sign}{p:.1}% from last month")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DerivedStatistics {
    pub reference_date: NaiveDate,
    pub total_income: f64,
    pub total_expense: f64,
    /// Income minus expense over the whole collection
    pub balance: f64,
    pub current_month: PeriodTotals,
    pub previous_month: PeriodTotals,
    pub income_change: PercentChange,
    pub expense_change: PercentChange,
    /// Expense totals for records that carry a category
    pub category_totals: BTreeMap<String, f64>,
    /// Each category's percentage of `total_expense`; empty when that is zero
    pub category_shares: BTreeMap<String, f64>,
    /// Valid expenses with no category; not part of `category_totals`
    pub uncategorized_expense: f64,
    /// Leading records of the input, in input order
    pub recent: Vec<Transaction>,
    pub transaction_count: usize,
}

pub fn aggregate(txns: &[Transaction], reference_date: NaiveDate) -> DerivedStatistics {
    aggregate_with(txns, reference_date, &AggregateOptions::default())
}

pub fn aggregate_with(
    txns: &[Transaction],
    reference_date: NaiveDate,
    opts: &AggregateOptions,
) -> DerivedStatistics {
    let total_income = sum_by_type(txns, TransactionType::Income);
    let total_expense = sum_by_type(txns, TransactionType::Expense);

    let current = YearMonth::of(reference_date);
    let current_month = PeriodTotals::compute(txns, current);
    let previous_month = PeriodTotals::compute(txns, current.previous());

    let (category_totals, uncategorized_expense) = category_totals(txns);
    let category_shares = category_totals
        .iter()
        .filter_map(|(c, amount)| share_of(*amount, total_expense).map(|s| (c.clone(), s)))
        .collect();

    let skipped = txns
        .iter()
        .filter(|t| !contributes(t, TransactionType::Income) && !contributes(t, TransactionType::Expense))
        .count();
    if skipped > 0 {
        tracing::debug!(skipped, total = txns.len(), "records excluded from sums");
    }

    DerivedStatistics {
        reference_date,
        total_income,
        total_expense,
        balance: total_income - total_expense,
        income_change: PercentChange::between(current_month.income, previous_month.income),
        expense_change: PercentChange::between(current_month.expense, previous_month.expense),
        current_month,
        previous_month,
        category_totals,
        category_shares,
        uncategorized_expense,
        recent: txns.iter().take(opts.recent_count).cloned().collect(),
        transaction_count: txns.len(),
    }
}

/// Expense totals keyed by category, plus the uncategorized remainder.
pub fn category_totals(txns: &[Transaction]) -> (BTreeMap<String, f64>, f64) {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    let mut uncategorized = 0.0;

    for t in txns.iter().filter(|t| contributes(t, TransactionType::Expense)) {
        let amount = t.amount.unwrap_or_default();
        match &t.category {
            Some(c) => *totals.entry(c.clone()).or_insert(0.0) += amount,
            None => uncategorized += amount,
        }
    }

    (totals, uncategorized)
}
