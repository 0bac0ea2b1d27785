//! The totals calculator: a pure reduction from a quotation to its summary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::milestone::paid_total;
use crate::money::{percent_of, sum};
use crate::sync::total_event_cost;
use crate::types::Quotation;

/// Whether tax is applied on top of the discounted package plus add-ons.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    #[default]
    None,
    /// `grand_total = taxable * (1 + tax_rate / 100)`.
    Exclusive,
}

/// Where `total_paid` comes from. Exactly one source per configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTracking {
    /// The single `advance_amount` field.
    #[default]
    Advance,
    /// Sum of the amounts of milestones flagged paid.
    Milestones,
}

impl TaxMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxMode::None => "none",
            TaxMode::Exclusive => "exclusive",
        }
    }
}

impl PaymentTracking {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentTracking::Advance => "advance",
            PaymentTracking::Milestones => "milestones",
        }
    }
}

impl fmt::Display for TaxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PaymentTracking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" | "flat" => Ok(TaxMode::None),
            "exclusive" | "gst" | "on" => Ok(TaxMode::Exclusive),
            _ => Err(CoreError::unknown("tax mode", s)),
        }
    }
}

impl FromStr for PaymentTracking {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "advance" => Ok(PaymentTracking::Advance),
            "milestones" | "milestone" => Ok(PaymentTracking::Milestones),
            _ => Err(CoreError::unknown("payment tracking mode", s)),
        }
    }
}

/// Pricing configuration of one deployment.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TotalsConfig {
    pub tax: TaxMode,
    pub payments: PaymentTracking,
}

/// Derived summary of a quotation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Totals {
    pub total_event_cost: Decimal,
    pub total_add_ons: Decimal,
    pub package_after_discount: Decimal,
    /// Present only in tax mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<Decimal>,
    pub grand_total: Decimal,
    pub total_paid: Decimal,
    pub balance_due: Decimal,
}

/// Compute the totals summary.
///
/// Reads the stored `base_amount`, not the live event sum; callers that
/// mutate events go through [`crate::sync::sync_base_amount`] first.
/// Neither the discounted package nor the balance is floored at zero.
/// Arithmetic saturates at the `Decimal` range, so no input can panic.
pub fn compute_totals(q: &Quotation, config: &TotalsConfig) -> Totals {
    let fin = &q.financials;
    let total_event_cost = total_event_cost(&q.events);
    let total_add_ons = sum(q.add_ons.iter().map(|a| a.price));

    let package_after_discount = fin.base_amount.saturating_sub(fin.discount);
    let taxable = package_after_discount.saturating_add(total_add_ons);

    let (tax_amount, grand_total) = match config.tax {
        TaxMode::None => (None, taxable),
        TaxMode::Exclusive => {
            let rate = fin.tax_rate.unwrap_or(Decimal::ZERO);
            let tax = percent_of(taxable, rate);
            (Some(tax), taxable.saturating_add(tax))
        }
    };

    let total_paid = match config.payments {
        PaymentTracking::Advance => fin.advance_amount,
        PaymentTracking::Milestones => paid_total(&fin.payment_milestones),
    };

    Totals {
        total_event_cost,
        total_add_ons,
        package_after_discount,
        tax_amount,
        grand_total,
        total_paid,
        balance_due: grand_total.saturating_sub(total_paid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AddOn, EventItem, MilestoneKind, PaymentMilestone};

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn event(cost: i64) -> EventItem {
        EventItem {
            id: crate::types::new_id("evt"),
            approx_cost: d(cost),
            ..Default::default()
        }
    }

    /// Two events (25000 + 40000), discount 5000, one 15000 add-on.
    fn scenario_a() -> Quotation {
        let mut q = Quotation {
            events: vec![event(25000), event(40000)],
            add_ons: vec![AddOn {
                id: "a1".into(),
                service: "LED Wall Live".into(),
                price: d(15000),
                ..Default::default()
            }],
            ..Default::default()
        };
        q.financials.discount = d(5000);
        crate::sync::sync_base_amount(&mut q);
        q
    }

    #[test]
    fn scenario_a_no_tax() {
        let q = scenario_a();
        let t = compute_totals(&q, &TotalsConfig::default());
        assert_eq!(q.financials.base_amount, d(65000));
        assert_eq!(t.total_event_cost, d(65000));
        assert_eq!(t.package_after_discount, d(60000));
        assert_eq!(t.grand_total, d(75000));
        assert_eq!(t.tax_amount, None);
    }

    #[test]
    fn scenario_b_advance() {
        let mut q = scenario_a();
        q.financials.advance_amount = d(50000);
        let t = compute_totals(&q, &TotalsConfig::default());
        assert_eq!(t.total_paid, d(50000));
        assert_eq!(t.balance_due, d(25000));
    }

    #[test]
    fn scenario_d_discount_exceeds_base() {
        let mut q = Quotation {
            events: vec![event(15000)],
            ..Default::default()
        };
        q.financials.discount = d(20000);
        crate::sync::sync_base_amount(&mut q);
        let t = compute_totals(&q, &TotalsConfig::default());
        assert_eq!(t.package_after_discount, d(-5000));
        assert_eq!(t.grand_total, d(-5000));
        assert_eq!(t.balance_due, d(-5000));
    }

    #[test]
    fn tax_mode_applies_rate_to_package_and_add_ons() {
        let mut q = scenario_a();
        q.financials.tax_rate = Some(d(18));
        let config = TotalsConfig {
            tax: TaxMode::Exclusive,
            ..Default::default()
        };
        let t = compute_totals(&q, &config);
        assert_eq!(t.tax_amount, Some(d(13500)));
        assert_eq!(t.grand_total, d(88500));
        assert_eq!(
            t.grand_total,
            (t.package_after_discount + t.total_add_ons) * (Decimal::ONE + d(18) / d(100))
        );
    }

    #[test]
    fn tax_mode_without_rate_is_zero_tax() {
        let q = scenario_a();
        let config = TotalsConfig {
            tax: TaxMode::Exclusive,
            ..Default::default()
        };
        let t = compute_totals(&q, &config);
        assert_eq!(t.tax_amount, Some(Decimal::ZERO));
        assert_eq!(t.grand_total, d(75000));
    }

    #[test]
    fn milestone_mode_ignores_advance_and_unpaid() {
        let mut q = scenario_a();
        q.financials.advance_amount = d(99999);
        q.financials.payment_milestones = vec![
            PaymentMilestone {
                id: "m1".into(),
                kind: MilestoneKind::Percentage,
                value: d(30),
                amount: d(22500),
                is_paid: true,
                ..Default::default()
            },
            PaymentMilestone {
                id: "m2".into(),
                kind: MilestoneKind::Fixed,
                value: d(10000),
                amount: d(10000),
                is_paid: false,
                ..Default::default()
            },
        ];
        let config = TotalsConfig {
            payments: PaymentTracking::Milestones,
            ..Default::default()
        };
        let t = compute_totals(&q, &config);
        assert_eq!(t.total_paid, d(22500));
        assert_eq!(t.balance_due, d(52500));
    }

    #[test]
    fn overpayment_gives_negative_balance() {
        let mut q = scenario_a();
        q.financials.advance_amount = d(80000);
        let t = compute_totals(&q, &TotalsConfig::default());
        assert_eq!(t.balance_due, d(-5000));
    }

    #[test]
    fn reads_stored_base_amount_not_live_sum() {
        let mut q = scenario_a();
        q.events.push(event(10000));
        let t = compute_totals(&q, &TotalsConfig::default());
        assert_eq!(t.total_event_cost, d(75000));
        assert_eq!(t.package_after_discount, d(60000));
    }

    #[test]
    fn pure_and_idempotent() {
        let q = scenario_a();
        let before = q.clone();
        let config = TotalsConfig::default();
        let first = compute_totals(&q, &config);
        let second = compute_totals(&q, &config);
        assert_eq!(first, second);
        assert_eq!(q, before);
    }

    #[test]
    fn empty_quotation_is_all_zero() {
        let t = compute_totals(&Quotation::default(), &TotalsConfig::default());
        assert_eq!(t.grand_total, Decimal::ZERO);
        assert_eq!(t.balance_due, Decimal::ZERO);
    }

    const MAX_TEXT: &str = "79228162514264337593543950335";

    #[test]
    fn huge_event_costs_saturate() {
        let mut q = Quotation {
            events: vec![event(0), event(0)],
            ..Default::default()
        };
        for e in &mut q.events {
            e.approx_cost = crate::money::coerce(MAX_TEXT);
        }
        crate::sync::sync_base_amount(&mut q);
        q.financials.advance_amount = Decimal::MIN;
        let t = compute_totals(&q, &TotalsConfig::default());
        assert_eq!(q.financials.base_amount, Decimal::MAX);
        assert_eq!(t.total_event_cost, Decimal::MAX);
        assert_eq!(t.grand_total, Decimal::MAX);
        assert_eq!(t.balance_due, Decimal::MAX);
    }

    #[test]
    fn huge_tax_rate_saturates() {
        let mut q = Quotation {
            events: vec![event(1_000_000_000)],
            ..Default::default()
        };
        crate::sync::sync_base_amount(&mut q);
        q.financials.tax_rate = Some(crate::money::coerce("100000000000000000000"));
        let config = TotalsConfig {
            tax: TaxMode::Exclusive,
            ..Default::default()
        };
        let t = compute_totals(&q, &config);
        let tax = crate::money::coerce("1000000000000000000000000000");
        assert_eq!(t.tax_amount, Some(tax));
        assert_eq!(t.grand_total, tax + d(1_000_000_000));

        q.financials.tax_rate = Some(Decimal::MAX);
        let t = compute_totals(&q, &config);
        assert_eq!(t.grand_total, Decimal::MAX);
    }

    #[test]
    fn stored_huge_amounts_load_and_total() {
        let json = format!(
            r#"{{"events":[{{"approx_cost":"{MAX_TEXT}"}},{{"approx_cost":"{MAX_TEXT}"}}],
                "financials":{{"base_amount":"{MAX_TEXT}","discount":"-{MAX_TEXT}"}},
                "add_ons":[{{"price":"{MAX_TEXT}"}}]}}"#
        );
        let q: Quotation = serde_json::from_str(&json).unwrap();
        assert_eq!(q.events.len(), 2);
        let t = compute_totals(&q, &TotalsConfig::default());
        assert_eq!(t.total_event_cost, Decimal::MAX);
        assert_eq!(t.package_after_discount, Decimal::MAX);
        assert_eq!(t.grand_total, Decimal::MAX);
    }

    #[test]
    fn mode_labels_parse() {
        assert_eq!("exclusive".parse::<TaxMode>().unwrap(), TaxMode::Exclusive);
        assert_eq!(
            "Milestones".parse::<PaymentTracking>().unwrap(),
            PaymentTracking::Milestones
        );
        assert!("both".parse::<PaymentTracking>().is_err());
    }
}
