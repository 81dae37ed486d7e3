//! Predicates shared by every derived view.
//!
//! A record only ever contributes to a sum through [`contributes`]; a missing
//! or non-numeric amount excludes the record instead of failing the batch.

use crate::period::YearMonth;
use crate::transaction::{Transaction, TransactionType};

/// Amount is present and finite.
pub fn has_valid_amount(txn: &Transaction) -> bool {
    txn.amount.is_some_and(f64::is_finite)
}

pub fn is_type(txn: &Transaction, kind: TransactionType) -> bool {
    txn.kind == Some(kind)
}

/// Dated inside `period`. Undated records belong to no month.
pub fn in_month(txn: &Transaction, period: YearMonth) -> bool {
    txn.date.is_some_and(|d| period.contains(d))
}

/// Type matches and the amount is valid.
pub fn contributes(txn: &Transaction, kind: TransactionType) -> bool {
    is_type(txn, kind) && has_valid_amount(txn)
}

/// Sum of valid amounts of the given type.
pub fn sum_by_type<'a>(
    txns: impl IntoIterator<Item = &'a Transaction>,
    kind: TransactionType,
) -> f64 {
    txns.into_iter()
        .filter(|t| contributes(t, kind))
        .filter_map(|t| t.amount)
        .sum()
}

/// Sum of valid amounts of the given type dated inside `period`.
pub fn sum_in_month<'a>(
    txns: impl IntoIterator<Item = &'a Transaction>,
    kind: TransactionType,
    period: YearMonth,
) -> f64 {
    sum_by_type(txns.into_iter().filter(|t| in_month(t, period)), kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_malformed_amount_excluded() {
        let mut broken = Transaction::income("b", 0.0, day(2024, 3, 1));
        broken.amount = None;
        let txns = vec![Transaction::income("a", 100.0, day(2024, 3, 1)), broken];
        assert_eq!(sum_by_type(&txns, TransactionType::Income), 100.0);
    }

    #[test]
    fn test_missing_type_excluded() {
        let mut untyped = Transaction::expense("u", 40.0, day(2024, 3, 1));
        untyped.kind = None;
        assert!(!contributes(&untyped, TransactionType::Expense));
        assert!(!contributes(&untyped, TransactionType::Income));
    }

    #[test]
    fn test_sum_in_month() {
        let txns = vec![
            Transaction::expense("a", 10.0, day(2024, 2, 29)),
            Transaction::expense("b", 20.0, day(2024, 3, 1)),
            Transaction::expense("c", 30.0, day(2023, 3, 1)),
        ];
        let march = YearMonth::new(2024, 3).unwrap();
        assert_eq!(sum_in_month(&txns, TransactionType::Expense, march), 20.0);
    }

    #[test]
    fn test_undated_in_no_month() {
        let mut t = Transaction::income("a", 1.0, day(2024, 3, 1));
        t.date = None;
        assert!(!in_month(&t, YearMonth::new(2024, 3).unwrap()));
    }
}
