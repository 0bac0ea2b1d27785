//! Payment milestone amounts.
//!
//! A milestone's `amount` is derived when that milestone is edited and is
//! not refreshed when the grand total later moves. [`refresh_all`] exists for
//! an explicit, operator-requested recompute.

use rust_decimal::Decimal;

use crate::money::{percent_of, sum};
use crate::types::{MilestoneKind, PaymentMilestone};

/// Amount owed for a milestone of `kind` with `value` against `grand_total`.
pub fn milestone_amount(kind: MilestoneKind, value: Decimal, grand_total: Decimal) -> Decimal {
    match kind {
        MilestoneKind::Percentage => percent_of(grand_total, value),
        MilestoneKind::Fixed => value,
    }
}

/// Recompute one milestone's amount against `grand_total`.
pub fn recalculate(milestone: &mut PaymentMilestone, grand_total: Decimal) {
    let amount = milestone_amount(milestone.kind, milestone.value, grand_total);
    tracing::debug!(
        milestone = %milestone.id,
        kind = ?milestone.kind,
        value = %milestone.value,
        %amount,
        "milestone amount recalculated"
    );
    milestone.amount = amount;
}

/// Recompute every milestone. Returns how many amounts actually changed.
pub fn refresh_all(milestones: &mut [PaymentMilestone], grand_total: Decimal) -> usize {
    let mut changed = 0;
    for m in milestones.iter_mut() {
        let before = m.amount;
        recalculate(m, grand_total);
        if m.amount != before {
            changed += 1;
        }
    }
    changed
}

/// Sum of amounts for milestones flagged paid.
pub fn paid_total(milestones: &[PaymentMilestone]) -> Decimal {
    sum(milestones.iter().filter(|m| m.is_paid).map(|m| m.amount))
}

/// Sum of percentage values across percentage milestones.
pub fn scheduled_percentage(milestones: &[PaymentMilestone]) -> Decimal {
    sum(milestones
        .iter()
        .filter(|m| m.kind == MilestoneKind::Percentage)
        .map(|m| m.value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn pct(id: &str, value: i64) -> PaymentMilestone {
        PaymentMilestone {
            id: id.into(),
            kind: MilestoneKind::Percentage,
            value: d(value),
            ..Default::default()
        }
    }

    #[test]
    fn percentage_of_grand_total() {
        let mut m = pct("m1", 30);
        recalculate(&mut m, d(75000));
        assert_eq!(m.amount, d(22500));
    }

    #[test]
    fn fixed_ignores_grand_total() {
        let mut m = PaymentMilestone {
            kind: MilestoneKind::Fixed,
            value: d(12000),
            ..Default::default()
        };
        recalculate(&mut m, d(75000));
        assert_eq!(m.amount, d(12000));
        recalculate(&mut m, d(1));
        assert_eq!(m.amount, d(12000));
    }

    #[test]
    fn percentage_of_negative_total_is_negative() {
        assert_eq!(
            milestone_amount(MilestoneKind::Percentage, d(50), d(-5000)),
            d(-2500)
        );
    }

    #[test]
    fn refresh_all_counts_changes() {
        let mut ms = vec![pct("a", 30), pct("b", 40), pct("c", 30)];
        assert_eq!(refresh_all(&mut ms, d(75000)), 3);
        assert_eq!(ms[1].amount, d(30000));
        assert_eq!(refresh_all(&mut ms, d(75000)), 0);
    }

    #[test]
    fn paid_total_only_counts_paid() {
        let mut ms = vec![pct("a", 30), pct("b", 70)];
        refresh_all(&mut ms, d(10000));
        ms[0].is_paid = true;
        assert_eq!(paid_total(&ms), d(3000));
        assert_eq!(scheduled_percentage(&ms), d(100));
    }
}
