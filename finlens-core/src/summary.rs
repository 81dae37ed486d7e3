//! Compact description of a transaction collection, sent as context to the
//! remote assistant instead of the raw records.

use serde::{Deserialize, Serialize};

use crate::filter::sum_by_type;
use crate::money::format_money;
use crate::transaction::{Transaction, TransactionType};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_balance: f64,
    /// Distinct categories in first-seen order
    pub categories: Vec<String>,
    pub transaction_count: usize,
}

impl TransactionSummary {
    pub fn from_transactions(txns: &[Transaction]) -> Self {
        let total_income = sum_by_type(txns, TransactionType::Income);
        let total_expense = sum_by_type(txns, TransactionType::Expense);

        let mut categories: Vec<String> = Vec::new();
        for c in txns.iter().filter_map(|t| t.category.as_ref()) {
            if !categories.contains(c) {
                categories.push(c.clone());
            }
        }

        Self {
            total_income,
            total_expense,
            net_balance: total_income - total_expense,
            categories,
            transaction_count: txns.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }

    /// Prompt-ready text block.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "User has no transaction data yet.".to_string();
        }
        format!(
            "User's Financial Data:\n\
             - Total Income: {}\n\
             - Total Expenses: {}\n\
             - Net Balance: {}\n\
             - Spending Categories: {}\n\
             - Total Transactions: {}\n",
            format_money(self.total_income),
            format_money(self.total_expense),
            format_money(self.net_balance),
            self.categories.join(", "),
            self.transaction_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_summary_counts_and_categories() {
        let mut broken = Transaction::expense("x", 0.0, day(3)).with_category("rent");
        broken.amount = None;
        let txns = vec![
            Transaction::income("a", 5000.0, day(1)).with_category("salary"),
            Transaction::expense("b", 1200.0, day(2)).with_category("food"),
            Transaction::expense("c", 300.0, day(2)).with_category("food"),
            broken,
        ];
        let s = TransactionSummary::from_transactions(&txns);
        assert_eq!(s.total_income, 5000.0);
        assert_eq!(s.total_expense, 1500.0);
        assert_eq!(s.net_balance, 3500.0);
        assert_eq!(s.categories, vec!["salary", "food", "rent"]);
        assert_eq!(s.transaction_count, 4);
    }

    #[test]
    fn test_render() {
        let txns = vec![Transaction::income("a", 12000.0, day(1)).with_category("salary")];
        let text = TransactionSummary::from_transactions(&txns).render();
        assert!(text.contains("Total Income: ₹12,000"));
        assert!(text.contains("Spending Categories: salary"));
        assert!(text.contains("Total Transactions: 1"));
    }

    #[test]
    fn test_render_empty() {
        let s = TransactionSummary::from_transactions(&[]);
        assert_eq!(s.render(), "User has no transaction data yet.");
    }
}
