//! Indian-rupee amounts and human dates.

use rust_decimal::{Decimal, RoundingStrategy};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Group digits the Indian way: last three, then pairs (`12,34,567`).
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while head.len() > 2 {
        let (rest, pair) = head.split_at(head.len() - 2);
        groups.push(pair);
        head = rest;
    }
    if !head.is_empty() {
        groups.push(head);
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Format an amount as whole rupees: `₹1,25,000`, `-₹5,000`.
///
/// Fractions round half away from zero.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}₹{}", group_indian(&digits))
}

/// `2026-11-24` as `24 Nov 2026`. Anything unparseable is returned as is.
pub fn display_date(iso: &str) -> String {
    let input = format_description!("[year]-[month]-[day]");
    let output = format_description!("[day padding:none] [month repr:short] [year]");
    match Date::parse(iso.trim(), &input) {
        Ok(d) => d.format(&output).unwrap_or_else(|_| iso.to_string()),
        Err(_) => iso.to_string(),
    }
}

/// Date part of an RFC 3339 timestamp, displayed like [`display_date`].
pub fn display_timestamp_date(ts: &str) -> String {
    let output = format_description!("[day padding:none] [month repr:short] [year]");
    match OffsetDateTime::parse(ts.trim(), &Rfc3339) {
        Ok(t) => t.date().format(&output).unwrap_or_else(|_| ts.to_string()),
        Err(_) => ts.to_string(),
    }
}

/// An RFC 3339 timestamp as `24 Nov 2026, 14:05 UTC`.
pub fn display_timestamp(ts: &str) -> String {
    let output = format_description!(
        "[day padding:none] [month repr:short] [year], [hour]:[minute] UTC"
    );
    match OffsetDateTime::parse(ts.trim(), &Rfc3339) {
        Ok(t) => t
            .to_offset(time::UtcOffset::UTC)
            .format(&output)
            .unwrap_or_else(|_| ts.to_string()),
        Err(_) => ts.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(format_inr(d(0)), "₹0");
        assert_eq!(format_inr(d(999)), "₹999");
        assert_eq!(format_inr(d(1000)), "₹1,000");
        assert_eq!(format_inr(d(75000)), "₹75,000");
        assert_eq!(format_inr(d(125000)), "₹1,25,000");
        assert_eq!(format_inr(d(12345678)), "₹1,23,45,678");
    }

    #[test]
    fn negatives_and_rounding() {
        assert_eq!(format_inr(d(-5000)), "-₹5,000");
        assert_eq!(format_inr(Decimal::new(22505, 1)), "₹2,251");
        assert_eq!(format_inr(Decimal::new(-22505, 1)), "-₹2,251");
        assert_eq!(format_inr(Decimal::new(-4, 1)), "₹0");
        assert_eq!(format_inr(Decimal::new(8850049, 2)), "₹88,500");
    }

    #[test]
    fn dates() {
        assert_eq!(display_date("2026-11-24"), "24 Nov 2026");
        assert_eq!(display_date("2026-03-07"), "7 Mar 2026");
        assert_eq!(display_date("sometime"), "sometime");
        assert_eq!(display_timestamp_date("2026-10-16T09:30:00Z"), "16 Oct 2026");
        assert_eq!(display_timestamp("2026-10-16T09:30:00Z"), "16 Oct 2026, 09:30 UTC");
        assert_eq!(display_timestamp("garbage"), "garbage");
    }
}
