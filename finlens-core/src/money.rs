//! Display formatting for amounts in generated text.

pub const CURRENCY_SYMBOL: &str = "₹";

/// Round to whole units and group thousands: `1234567.4` -> `1,234,567`.
pub fn group_whole(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Currency-prefixed whole amount: `₹5,000`, `₹-1,200`.
pub fn format_money(amount: f64) -> String {
    format!("{CURRENCY_SYMBOL}{}", group_whole(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping() {
        assert_eq!(group_whole(0.0), "0");
        assert_eq!(group_whole(999.0), "999");
        assert_eq!(group_whole(1000.0), "1,000");
        assert_eq!(group_whole(1234567.4), "1,234,567");
        assert_eq!(group_whole(-3800.0), "-3,800");
    }

    #[test]
    fn test_rounds_to_whole_units() {
        assert_eq!(group_whole(1999.5), "2,000");
        assert_eq!(group_whole(-0.4), "0");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(5000.0), "₹5,000");
        assert_eq!(format_money(-1200.0), "₹-1,200");
    }
}
