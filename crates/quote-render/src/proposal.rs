//! The printable proposal, as Markdown.

use quote_core::catalog::Catalog;
use quote_core::{EventItem, MilestoneKind, PaymentTracking, Quotation, TeamMember, Totals, TotalsConfig};
use rust_decimal::Decimal;

use crate::currency::{display_date, format_inr};
use crate::profile::StudioProfile;

const TO_BE_CONFIRMED: &str = "_To be confirmed by client_";
const UNKNOWN_SKILL: &str = "Unknown Skill";
const ACCEPTANCE_NOTE: &str = "This quotation is digitally generated. Confirmation via email or \
advance payment implies acceptance of the terms and conditions.";

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}

fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Non-blank lines of a free-text block, trimmed.
fn list_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

fn push_list(out: &mut String, text: &str) {
    for line in list_lines(text) {
        out.push_str(&format!("- {line}\n"));
    }
}

/// `1 Candid Photographer, 2 Cinematographer`, or `-` for an empty team.
fn team_string(team: &[TeamMember], catalog: &Catalog) -> String {
    if team.is_empty() {
        return "-".to_string();
    }
    team.iter()
        .map(|m| {
            let name = catalog.skill_name(&m.skill_id).unwrap_or(UNKNOWN_SKILL);
            format!("{} {}", m.count, name)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn event_date(e: &EventItem) -> String {
    if e.is_date_decided && !e.date.trim().is_empty() {
        format!("{} • {}", e.date, e.time_range)
    } else {
        TO_BE_CONFIRMED.to_string()
    }
}

fn event_venue(e: &EventItem) -> String {
    if e.is_venue_decided && !e.venue.trim().is_empty() {
        e.venue.clone()
    } else {
        TO_BE_CONFIRMED.to_string()
    }
}

/// Client name up to the first `&`.
fn prepared_for(name: &str) -> &str {
    name.split('&').next().unwrap_or("").trim()
}

fn write_header(out: &mut String, q: &Quotation, profile: &StudioProfile) {
    out.push_str(&format!("# {}\n\n", profile.name));
    out.push_str(&format!("{}  \n{}\n\n", profile.tagline, profile.regions));
    out.push_str(&format!("**Quotation No:** {}  \n", q.client.quote_number));
    out.push_str(&format!("**Date:** {}  \n", display_date(&q.client.date)));
    if !q.client.valid_till.trim().is_empty() {
        out.push_str(&format!(
            "**Valid Till:** {}  \n",
            display_date(&q.client.valid_till)
        ));
    }
    out.push_str(&format!(
        "**Prepared For:** {}\n\n",
        prepared_for(&q.client.name)
    ));
}

fn write_client(out: &mut String, q: &Quotation) {
    let c = &q.client;
    out.push_str("## Client Information\n\n");
    out.push_str(&format!("- **Name:** {}\n", c.name));
    out.push_str(&format!("- **Company:** {}\n", or_dash(&c.company)));
    out.push_str(&format!("- **Phone:** {}\n", c.phone));
    out.push_str(&format!("- **Email:** {}\n", c.email));
    out.push_str(&format!("- **Address:** {}\n", or_dash(&c.address)));
    out.push_str(&format!("- **Event Locations:** {}\n\n", c.locations));
}

fn write_events(out: &mut String, q: &Quotation, catalog: &Catalog) {
    out.push_str("## Event Coverage Breakdown\n\n");
    for (i, e) in q.events.iter().enumerate() {
        let title = if e.name.trim().is_empty() {
            format!("Event {}", i + 1)
        } else {
            e.name.clone()
        };
        out.push_str(&format!("### 📍 {title}\n\n"));
        out.push_str(&format!("- **Date:** {}\n", event_date(e)));
        out.push_str(&format!("- **Venue:** {}\n", event_venue(e)));
        out.push_str(&format!("- **Coverage:** {}\n", e.duration));
        out.push_str(&format!("- **Price:** {}\n", format_inr(e.approx_cost)));
        out.push_str(&format!("- **Team:** {}\n\n", team_string(&e.team, catalog)));
    }
}

fn write_summary(out: &mut String, q: &Quotation, totals: &Totals, config: &TotalsConfig) {
    let fin = &q.financials;
    let package = if fin.package_name.trim().is_empty() {
        "Package"
    } else {
        fin.package_name.as_str()
    };

    out.push_str("## Package Summary\n\n");
    out.push_str("| | |\n|---|---:|\n");
    out.push_str(&format!(
        "| {} | {} |\n",
        cell(package),
        format_inr(fin.base_amount)
    ));
    if fin.discount > Decimal::ZERO {
        out.push_str(&format!("| Discount | - {} |\n", format_inr(fin.discount)));
    }
    if totals.total_add_ons > Decimal::ZERO {
        out.push_str(&format!(
            "| Additional Services (Add-ons) | + {} |\n",
            format_inr(totals.total_add_ons)
        ));
    }
    if let Some(tax) = totals.tax_amount {
        let rate = fin.tax_rate.unwrap_or(Decimal::ZERO).normalize();
        out.push_str(&format!("| Tax ({rate}%) | + {} |\n", format_inr(tax)));
    }
    out.push_str(&format!(
        "| **Grand Total** | **{}** |\n",
        format_inr(totals.grand_total)
    ));
    match config.payments {
        PaymentTracking::Advance if fin.advance_amount > Decimal::ZERO => {
            out.push_str(&format!(
                "| Advance Paid | - {} |\n",
                format_inr(fin.advance_amount)
            ));
        }
        PaymentTracking::Milestones if totals.total_paid > Decimal::ZERO => {
            out.push_str(&format!(
                "| Payments Received | - {} |\n",
                format_inr(totals.total_paid)
            ));
        }
        _ => {}
    }
    out.push_str(&format!(
        "| **Balance Due** | **{}** |\n\n",
        format_inr(totals.balance_due)
    ));
}

fn write_schedule(out: &mut String, q: &Quotation) {
    let milestones = &q.financials.payment_milestones;
    if milestones.is_empty() {
        return;
    }
    out.push_str("## Payment Milestones\n\n");
    out.push_str("| Milestone | Due | Share | Amount | Status |\n");
    out.push_str("|---|---|---|---:|---|\n");
    for m in milestones {
        let share = match m.kind {
            MilestoneKind::Percentage => format!("{}%", m.value.normalize()),
            MilestoneKind::Fixed => "Fixed".to_string(),
        };
        let status = if m.is_paid {
            let mut s = "Paid".to_string();
            let detail: Vec<String> = [
                m.paid_at.as_deref().map(display_date),
                m.method.as_ref().map(|method| method.to_string()),
            ]
            .into_iter()
            .flatten()
            .collect();
            if !detail.is_empty() {
                s.push_str(&format!(" ({})", detail.join(", ")));
            }
            s
        } else {
            "Pending".to_string()
        };
        let due = if m.due_date.trim().is_empty() {
            "-".to_string()
        } else {
            display_date(&m.due_date)
        };
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            cell(or_dash(&m.name)),
            due,
            share,
            format_inr(m.amount),
            status
        ));
    }
    out.push('\n');
}

fn write_add_ons(out: &mut String, q: &Quotation) {
    if q.add_ons.is_empty() {
        return;
    }
    out.push_str("## Optional Add-ons\n\n");
    out.push_str("| Service | Description | Price |\n|---|---|---:|\n");
    for a in &q.add_ons {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            cell(&a.service),
            cell(&a.description),
            format_inr(a.price)
        ));
    }
    out.push('\n');
}

fn write_meta(out: &mut String, q: &Quotation) {
    let meta = &q.meta;

    out.push_str("## Final Deliverables\n\n");
    push_list(out, &meta.deliverables);
    out.push('\n');

    out.push_str("## Bank Details & Logistics\n\n");
    if !list_lines(&meta.payment_terms).is_empty() {
        out.push_str("**Payment Schedule**\n\n");
        push_list(out, &meta.payment_terms);
        out.push('\n');
    }
    out.push_str("**Delivery Timeline**\n\n");
    push_list(out, &meta.delivery_timeline);
    out.push('\n');
    out.push_str("**Bank Details**\n\n```text\n");
    out.push_str(meta.bank_details.trim_end());
    out.push_str("\n```\n\n");

    out.push_str("## Terms & Conditions\n\n");
    push_list(out, &meta.terms);
    out.push('\n');
}

fn write_acceptance(out: &mut String, q: &Quotation, profile: &StudioProfile) {
    let client_sign = if q.meta.client_sign_name.trim().is_empty() {
        "Client Signature"
    } else {
        q.meta.client_sign_name.as_str()
    };
    out.push_str("## Acceptance\n\n");
    out.push_str(ACCEPTANCE_NOTE);
    out.push_str("\n\n");
    out.push_str("| Client | Authorized Signatory |\n|---|---|\n");
    out.push_str(&format!(
        "| {} | {} |\n\n",
        cell(client_sign),
        cell(&q.meta.studio_sign_name)
    ));
    out.push_str("---\n\n");
    out.push_str(&format!(
        "_Your moments, our lens. Thank you for choosing {}._\n",
        profile.name
    ));
}

/// Render the full proposal document.
pub fn render_proposal(
    q: &Quotation,
    totals: &Totals,
    config: &TotalsConfig,
    catalog: &Catalog,
    profile: &StudioProfile,
) -> String {
    let mut out = String::new();
    write_header(&mut out, q, profile);
    write_client(&mut out, q);
    write_events(&mut out, q, catalog);
    write_summary(&mut out, q, totals, config);
    write_schedule(&mut out, q);
    write_add_ons(&mut out, q);
    write_meta(&mut out, q);
    write_acceptance(&mut out, q, profile);
    out
}
