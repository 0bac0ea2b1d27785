//! Keeps the stored base amount equal to the live sum of event costs.

use rust_decimal::Decimal;

use crate::money::sum;
use crate::types::{EventItem, Quotation};

/// Sum of `approx_cost` across events.
pub fn total_event_cost(events: &[EventItem]) -> Decimal {
    sum(events.iter().map(|e| e.approx_cost))
}

/// Write the event-cost sum into `financials.base_amount` if it diverged.
///
/// Returns `true` when a write happened. The equality guard is the contract:
/// an unchanged sum leaves the aggregate untouched.
pub fn sync_base_amount(q: &mut Quotation) -> bool {
    let total = total_event_cost(&q.events);
    if total == q.financials.base_amount {
        return false;
    }
    tracing::debug!(
        from = %q.financials.base_amount,
        to = %total,
        "base amount resynced from event costs"
    );
    q.financials.base_amount = total;
    true
}

/// Whether the stored base amount currently disagrees with the event sum.
pub fn is_out_of_sync(q: &Quotation) -> bool {
    total_event_cost(&q.events) != q.financials.base_amount
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(cost: i64) -> EventItem {
        EventItem {
            approx_cost: Decimal::from(cost),
            ..Default::default()
        }
    }

    #[test]
    fn writes_when_diverged() {
        let mut q = Quotation {
            events: vec![event(25000), event(40000)],
            ..Default::default()
        };
        assert!(is_out_of_sync(&q));
        assert!(sync_base_amount(&mut q));
        assert_eq!(q.financials.base_amount, Decimal::from(65000));
        assert!(!is_out_of_sync(&q));
    }

    #[test]
    fn no_write_when_equal() {
        let mut q = Quotation {
            events: vec![event(25000)],
            ..Default::default()
        };
        q.financials.base_amount = Decimal::from(25000);
        assert!(!sync_base_amount(&mut q));
        assert!(!sync_base_amount(&mut q));
    }

    #[test]
    fn equal_value_with_different_scale_is_not_a_change() {
        let mut q = Quotation {
            events: vec![event(100)],
            ..Default::default()
        };
        q.financials.base_amount = Decimal::new(10000, 2);
        assert!(!sync_base_amount(&mut q));
    }

    #[test]
    fn empty_event_list_zeroes_base() {
        let mut q = Quotation::default();
        q.financials.base_amount = Decimal::from(5000);
        assert!(sync_base_amount(&mut q));
        assert_eq!(q.financials.base_amount, Decimal::ZERO);
    }
}
