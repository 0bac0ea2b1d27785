//! The history diff logger.
//!
//! A save compares the previously stored snapshot with the new one on a
//! small set of watched fields. Anything else may change silently.

use quote_core::Quotation;
use rust_decimal::Decimal;

use crate::record::HistoryLog;

pub const CREATED_ACTION: &str = "Created new quotation";

fn amount(d: Decimal) -> Decimal {
    d.normalize()
}

/// Human-readable changes between two snapshots, in a fixed order:
/// client name, base amount, add-on count, advance amount.
pub fn diff_watched(old: &Quotation, new: &Quotation) -> Vec<String> {
    let mut changes = Vec::new();

    if old.client.name != new.client.name {
        changes.push(format!(
            "Client Name: \"{}\" → \"{}\"",
            old.client.name, new.client.name
        ));
    }
    if old.financials.base_amount != new.financials.base_amount {
        changes.push(format!(
            "Base Amount: {} → {}",
            amount(old.financials.base_amount),
            amount(new.financials.base_amount)
        ));
    }
    if old.add_ons.len() != new.add_ons.len() {
        changes.push("Add-ons updated".to_string());
    }
    if old.financials.advance_amount != new.financials.advance_amount {
        changes.push(format!(
            "Advance Amount: {} → {}",
            amount(old.financials.advance_amount),
            amount(new.financials.advance_amount)
        ));
    }

    changes
}

/// A single history entry describing the save, or `None` when no watched
/// field changed.
pub fn digest_entry(
    old: &Quotation,
    new: &Quotation,
    user: &str,
    timestamp: &str,
) -> Option<HistoryLog> {
    let changes = diff_watched(old, new);
    if changes.is_empty() {
        return None;
    }
    Some(HistoryLog::new(user, changes.join("\n"), timestamp))
}
