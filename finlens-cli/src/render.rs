//! Plain-text views printed by `dashboard` and `markers`.

use finlens_core::{
    format_money, share_of, DerivedStatistics, MarkerLayout, Transaction, TransactionType,
};
use std::fmt::Write;

fn signed_amount(t: &Transaction) -> String {
    let amount = t.amount.unwrap_or(0.0);
    match t.kind {
        Some(TransactionType::Income) => format!("+{}", format_money(amount)),
        Some(TransactionType::Expense) => format!("-{}", format_money(amount)),
        None => format_money(amount),
    }
}

fn share_suffix(share: Option<f64>) -> String {
    share.map(|p| format!(" ({p:.1}%)")).unwrap_or_default()
}

fn label(t: &Transaction) -> &str {
    t.description
        .as_deref()
        .or(t.category.as_deref())
        .unwrap_or("(no description)")
}

pub fn dashboard(stats: &DerivedStatistics) -> String {
    let mut out = String::new();
    let cur = &stats.current_month;

    let _ = writeln!(out, "# Dashboard (as of {})\n", stats.reference_date);
    let _ = writeln!(out, "Balance:        {}", format_money(stats.balance));
    let _ = writeln!(out, "Total income:   {}", format_money(stats.total_income));
    let _ = writeln!(out, "Total expenses: {}", format_money(stats.total_expense));
    let _ = writeln!(out, "Records:        {}\n", stats.transaction_count);

    let _ = writeln!(out, "## {}\n", cur.period);
    let _ = writeln!(
        out,
        "Income:   {} ({})",
        format_money(cur.income),
        stats.income_change
    );
    let _ = writeln!(
        out,
        "Expenses: {} ({})",
        format_money(cur.expense),
        stats.expense_change
    );
    let _ = writeln!(out, "Net:      {}\n", format_money(cur.balance()));

    let _ = writeln!(out, "## Expenses by category\n");
    if stats.category_totals.is_empty() && stats.uncategorized_expense == 0.0 {
        let _ = writeln!(out, "(none)");
    }
    for (category, total) in &stats.category_totals {
        let share = stats.category_shares.get(category).copied();
        let _ = writeln!(
            out,
            "- {category}: {}{}",
            format_money(*total),
            share_suffix(share)
        );
    }
    if stats.uncategorized_expense != 0.0 {
        let share = share_of(stats.uncategorized_expense, stats.total_expense);
        let _ = writeln!(
            out,
            "- (uncategorized): {}{}",
            format_money(stats.uncategorized_expense),
            share_suffix(share)
        );
    }

    let _ = writeln!(out, "\n## Recent\n");
    if stats.recent.is_empty() {
        let _ = writeln!(out, "(none)");
    }
    for t in &stats.recent {
        let date = t.date.map(|d| d.to_string()).unwrap_or_else(|| "----------".to_string());
        let _ = writeln!(out, "- {date} {} {}", signed_amount(t), label(t));
    }
    out
}

pub fn markers(layout: &MarkerLayout) -> String {
    let mut out = String::new();
    let center = if layout.has_data_center { "first marker" } else { "fallback" };
    let _ = writeln!(
        out,
        "Center: {:.5}, {:.5} ({center}), zoom {}",
        layout.center.lat, layout.center.lng, layout.zoom_hint
    );
    let _ = writeln!(out, "Markers: {}\n", layout.markers.len());

    for m in &layout.markers {
        let amount = m.amount.map(format_money).unwrap_or_else(|| "-".to_string());
        let kind = m.kind.map(|k| k.as_str()).unwrap_or("?");
        let _ = write!(
            out,
            "- {} [{kind} {amount}] {:.5}, {:.5}",
            m.id, m.position.lat, m.position.lng
        );
        if m.occurrence > 0 {
            let _ = write!(
                out,
                " (#{} at {:.5}, {:.5})",
                m.occurrence + 1,
                m.original.lat,
                m.original.lng
            );
        }
        let _ = writeln!(out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use finlens_core::{aggregate, layout};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_dashboard_text() {
        let txns = vec![
            Transaction::income("a", 5000.0, d(2024, 3, 1)).with_description("Salary"),
            Transaction::expense("b", 1200.0, d(2024, 3, 2)).with_category("food"),
        ];
        let text = dashboard(&aggregate(&txns, d(2024, 3, 15)));
        assert!(text.contains("Balance:        ₹3,800"));
        assert!(text.contains("## March 2024"));
        assert!(text.contains("No data last month"));
        assert!(text.contains("- food: ₹1,200 (100.0%)\n"));
        assert!(text.contains("- 2024-03-01 +₹5,000 Salary"));
        assert!(text.contains("- 2024-03-02 -₹1,200 food"));
    }

    #[test]
    fn test_dashboard_shares() {
        let txns = vec![
            Transaction::expense("a", 250.0, d(2024, 3, 1)).with_category("food"),
            Transaction::expense("b", 750.0, d(2024, 3, 2)),
        ];
        let text = dashboard(&aggregate(&txns, d(2024, 3, 15)));
        assert!(text.contains("- food: ₹250 (25.0%)\n"));
        assert!(text.contains("- (uncategorized): ₹750 (75.0%)\n"));

        // No expense total to divide by: amounts only
        let zero = vec![Transaction::expense("z", 0.0, d(2024, 3, 1)).with_category("misc")];
        let text = dashboard(&aggregate(&zero, d(2024, 3, 15)));
        assert!(text.contains("- misc: ₹0\n"));
    }

    #[test]
    fn test_empty_dashboard() {
        let text = dashboard(&aggregate(&[], d(2024, 3, 15)));
        assert!(text.contains("Records:        0"));
        assert_eq!(text.matches("(none)").count(), 2);
    }

    #[test]
    fn test_markers_text() {
        let txns = vec![
            Transaction::expense("a", 10.0, d(2024, 3, 1)).with_location(12.9, 77.6),
            Transaction::expense("b", 20.0, d(2024, 3, 1)).with_location(12.9, 77.6),
        ];
        let text = markers(&layout(&txns));
        assert!(text.contains("Center: 12.90000, 77.60000 (first marker), zoom 12"));
        assert!(text.contains("- a [expense ₹10] 12.90000, 77.60000\n"));
        assert!(text.contains("(#2 at 12.90000, 77.60000)"));
    }

    #[test]
    fn test_markers_fallback_center() {
        let text = markers(&layout(&[]));
        assert!(text.contains("(fallback), zoom 5"));
        assert!(text.contains("Markers: 0"));
    }
}
