//! Starting points for new quotations.

use rand::Rng;
use rust_decimal::Decimal;
use time::{Date, Duration};

use crate::milestone;
use crate::sync::sync_base_amount;
use crate::totals::{compute_totals, TotalsConfig};
use crate::types::*;

/// Days a fresh quotation stays valid.
pub const VALIDITY_DAYS: i64 = 14;

/// Format a date as `YYYY-MM-DD`.
pub fn iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Today's date in UTC.
pub fn today_utc() -> Date {
    time::OffsetDateTime::now_utc().date()
}

/// A fresh quotation number: `QUO-<year>-<0..9999>`.
pub fn quote_number<R: Rng>(year: i32, rng: &mut R) -> String {
    format!("QUO-{year}-{:04}", rng.gen_range(0..10_000))
}

#[allow(clippy::too_many_arguments)]
fn event(
    name: &str,
    date: &str,
    time_range: &str,
    venue: &str,
    duration: &str,
    team: &[(&str, u32)],
    notes: &str,
    cost: i64,
) -> EventItem {
    EventItem {
        id: new_id("evt"),
        name: name.into(),
        is_date_decided: true,
        date: date.into(),
        time_range: time_range.into(),
        is_venue_decided: true,
        venue: venue.into(),
        duration: duration.into(),
        team: team
            .iter()
            .map(|(skill_id, count)| TeamMember {
                skill_id: skill_id.to_string(),
                count: *count,
            })
            .collect(),
        notes: notes.into(),
        approx_cost: Decimal::from(cost),
    }
}

fn percentage(name: &str, value: i64, due: &str) -> PaymentMilestone {
    PaymentMilestone {
        id: new_id("pm"),
        name: name.into(),
        kind: MilestoneKind::Percentage,
        value: Decimal::from(value),
        due_date: due.into(),
        ..Default::default()
    }
}

/// The studio's standard proposal: two events, one add-on, a 30/40/30
/// payment schedule with the booking advance already paid by UPI, and the
/// usual deliverables and terms.
///
/// Base amount is synced and milestone amounts are computed against the
/// flat (no-tax) grand total.
pub fn sample_quotation(today: Date) -> Quotation {
    let mut q = Quotation {
        client: ClientDetails {
            id: None,
            name: "Rahul Sharma & Priya Verma".into(),
            company: String::new(),
            phone: "+91-9876543210".into(),
            email: "rahul.priya@example.com".into(),
            address: String::new(),
            tagline: "Wedding Coverage – Lucknow & Varanasi".into(),
            locations: "Lucknow (Haldi, Sangeet, Wedding) & Varanasi (Reception)".into(),
            reference: "Instagram / Friend Reference".into(),
            date: iso_date(today),
            valid_till: iso_date(today + Duration::days(VALIDITY_DAYS)),
            quote_number: "QUO-2025-0012".into(),
            status: QuoteStatus::Draft,
        },
        events: vec![
            event(
                "Haldi Ceremony",
                "2026-11-24",
                "10:00 AM – 2:00 PM",
                "Lucknow (Home)",
                "4–5 Hours",
                &[("s1", 1), ("s2", 1)],
                "Day function – mostly family ritual coverage.",
                25000,
            ),
            event(
                "Sangeet Ceremony",
                "2026-11-25",
                "5:00 PM – 11:00 PM",
                "Lucknow Banquet",
                "5–6 Hours",
                &[("s1", 1), ("s3", 1), ("s2", 1)],
                "",
                40000,
            ),
        ],
        financials: Financials {
            package_name: "Complete Mix Package – Haldi + Sangeet + Wedding + Reception".into(),
            base_amount: Decimal::ZERO,
            discount: Decimal::from(5000),
            tax_rate: None,
            advance_amount: Decimal::ZERO,
            payment_milestones: vec![
                percentage("Booking Advance", 30, ""),
                percentage("Wedding Day", 40, "2026-11-29"),
                percentage("Final Delivery", 30, ""),
            ],
            notes: "Includes travel within city limits and standard editing.".into(),
        },
        add_ons: vec![AddOn {
            id: new_id("add"),
            service: "LED Wall Live".into(),
            description: "Live projection setup with LED".into(),
            price: Decimal::from(15000),
        }],
        meta: TermsAndDeliverables {
            deliverables: "All Edited Photos (Approx 2500–3500 across events)\n\
                           Wedding Cinematic Film (5–10 minutes)\n\
                           Sangeet Film (5–7 minutes)\n\
                           Full Wedding Video (1.5–2.5 hours)\n\
                           Sangeet Full Video (1–1.5 hours)\n\
                           Reels (3 Custom Reels – 20–30 sec each)\n\
                           Premium Wedding Album – 40 Sheets\n\
                           Mini Album – 1 Piece\n\
                           Premium Pen Drive + Box\n\
                           Online Cloud Gallery"
                .into(),
            delivery_timeline: "Photos: 10–12 Days\n\
                                Videos: 25–30 Days\n\
                                Albums: 10–15 Days After Selection"
                .into(),
            bank_details: "A/C: XXXXXXXX1234\nIFSC: BARB0XXXXXX\nUPI: merastudio@ybl".into(),
            payment_terms: "30% at booking\n40% on the wedding day\n30% on final delivery".into(),
            terms: "Booking is confirmed only after advance payment.\n\
                    Extra hours are chargeable as per studio policy.\n\
                    Travel & stay for outstation events must be arranged by the client.\n\
                    Video/music selection is client’s responsibility.\n\
                    Studio may use selected photos/videos for portfolio.\n\
                    All disputes subject to Varanasi jurisdiction."
                .into(),
            client_sign_name: "Rahul Sharma".into(),
            studio_sign_name: "Mera Studio & Films – Authorized Signatory".into(),
        },
    };
    sync_base_amount(&mut q);
    let grand_total = compute_totals(&q, &TotalsConfig::default()).grand_total;
    milestone::refresh_all(&mut q.financials.payment_milestones, grand_total);
    if let Some(booking) = q.financials.payment_milestones.first_mut() {
        booking.is_paid = true;
        booking.paid_at = Some(iso_date(today));
        booking.method = Some(PaymentMethod::Upi);
    }
    q
}

/// A new quotation: the sample with a fresh number, no add-ons and no
/// recorded payments.
pub fn new_quotation<R: Rng>(today: Date, rng: &mut R) -> Quotation {
    let mut q = sample_quotation(today);
    q.client.quote_number = quote_number(today.year(), rng);
    q.add_ons.clear();
    for m in &mut q.financials.payment_milestones {
        m.is_paid = false;
        m.paid_at = None;
        m.method = None;
        m.proof = None;
    }
    let grand_total = compute_totals(&q, &TotalsConfig::default()).grand_total;
    milestone::refresh_all(&mut q.financials.payment_milestones, grand_total);
    q
}

/// An empty quotation carrying only dates and a number.
pub fn blank_quotation<R: Rng>(today: Date, rng: &mut R) -> Quotation {
    let mut q = Quotation::default();
    q.client.date = iso_date(today);
    q.client.valid_till = iso_date(today + Duration::days(VALIDITY_DAYS));
    q.client.quote_number = quote_number(today.year(), rng);
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use time::macros::date;

    #[test]
    fn iso_date_pads() {
        assert_eq!(iso_date(date!(2026 - 03 - 07)), "2026-03-07");
    }

    #[test]
    fn quote_number_format() {
        let mut rng = StepRng::new(0, 1);
        let n = quote_number(2026, &mut rng);
        assert!(n.starts_with("QUO-2026-"));
        assert_eq!(n.len(), "QUO-2026-0000".len());
    }

    #[test]
    fn sample_is_synced_and_scheduled() {
        let q = sample_quotation(date!(2026 - 10 - 16));
        assert_eq!(q.financials.base_amount, Decimal::from(65000));
        assert_eq!(q.client.valid_till, "2026-10-30");
        let amounts: Vec<Decimal> = q
            .financials
            .payment_milestones
            .iter()
            .map(|m| m.amount)
            .collect();
        assert_eq!(
            amounts,
            vec![
                Decimal::from(22500),
                Decimal::from(30000),
                Decimal::from(22500)
            ]
        );
    }

    #[test]
    fn sample_booking_advance_is_paid() {
        let q = sample_quotation(date!(2026 - 10 - 16));
        let ms = &q.financials.payment_milestones;
        assert!(ms[0].is_paid);
        assert_eq!(ms[0].paid_at.as_deref(), Some("2026-10-16"));
        assert_eq!(ms[0].method, Some(PaymentMethod::Upi));
        assert!(ms[1..].iter().all(|m| !m.is_paid));
        let config = TotalsConfig {
            payments: crate::totals::PaymentTracking::Milestones,
            ..Default::default()
        };
        let t = compute_totals(&q, &config);
        assert_eq!(t.total_paid, Decimal::from(22500));
        assert_eq!(t.balance_due, Decimal::from(52500));
    }

    #[test]
    fn new_quotation_drops_add_ons() {
        let mut rng = StepRng::new(7, 1);
        let q = new_quotation(date!(2026 - 10 - 16), &mut rng);
        assert!(q.add_ons.is_empty());
        assert!(q
            .financials
            .payment_milestones
            .iter()
            .all(|m| !m.is_paid && m.paid_at.is_none() && m.method.is_none()));
        assert!(q.client.quote_number.starts_with("QUO-2026-"));
        assert_ne!(q.client.quote_number, "QUO-2025-0012");
    }

    #[test]
    fn blank_quotation_is_empty() {
        let mut rng = StepRng::new(0, 1);
        let q = blank_quotation(date!(2026 - 10 - 16), &mut rng);
        assert!(q.events.is_empty());
        assert_eq!(q.financials.base_amount, Decimal::ZERO);
        assert_eq!(q.client.date, "2026-10-16");
    }
}
