//! Caller-side ordering. The derivations never sort; this reproduces the
//! newest-first order the storage query hands back.

use finlens_core::Transaction;
use std::cmp::Ordering;

/// New vector ordered by date descending; undated records last, ties keep
/// their input order.
pub fn sort_newest_first(txns: &[Transaction]) -> Vec<Transaction> {
    let mut out = txns.to_vec();
    out.sort_by(|a, b| match (a.date, b.date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_newest_first_stable() {
        let mut undated = Transaction::income("u", 1.0, day(2024, 1, 1));
        undated.date = None;
        let txns = vec![
            undated,
            Transaction::income("old", 1.0, day(2023, 5, 1)),
            Transaction::income("new-a", 1.0, day(2024, 2, 1)),
            Transaction::income("new-b", 1.0, day(2024, 2, 1)),
        ];
        let sorted = sort_newest_first(&txns);
        let ids: Vec<_> = sorted.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["new-a", "new-b", "old", "u"]);
        // input untouched
        assert_eq!(txns[0].id, "u");
    }
}
