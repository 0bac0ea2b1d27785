use clap::Subcommand;
use quote_core::catalog::Catalog;
use quote_core::{ClientField, EventItem, MetaField, MilestoneKind, PaymentMethod, QuoteEditor, QuoteStatus};
use quote_render::format_inr;
use quote_store::HistoryLog;
use std::path::Path;

use crate::cmd_quote::{open_locked, totals_lines};

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ClientCmd {
    /// Set a client field (name, company, phone, email, address, tagline,
    /// locations, reference, quote_number, date, valid_till)
    Set { field: String, value: String },
    /// Fill client details from a catalog client
    Link { client_id: String },
    /// Set status (Draft, Sent, Confirmed, On Hold)
    Status { status: String },
}

#[derive(Subcommand)]
pub enum EventCmd {
    /// Add an event
    Add {
        name: String,
        #[arg(long, default_value = "0")]
        cost: String,
        #[arg(long, default_value = "")]
        duration: String,
    },
    /// Add an event from a catalog template (e.g. t3)
    Template { template_id: String },
    /// Remove an event
    Remove { event_id: String },
    /// Move an event to a position (0-based)
    Move { event_id: String, index: usize },
    /// Set the approximate cost
    Cost { event_id: String, amount: String },
    /// Set the date, or mark it undecided when omitted
    Date {
        event_id: String,
        date: Option<String>,
        /// Time range, e.g. "10:00 AM – 2:00 PM"
        #[arg(long)]
        time: Option<String>,
    },
    /// Set the venue, or mark it undecided when omitted
    Venue { event_id: String, venue: Option<String> },
    /// Rename an event
    Name { event_id: String, name: String },
    /// Set coverage duration
    Duration { event_id: String, duration: String },
    /// Set notes
    Notes { event_id: String, notes: String },
    /// Set headcount for a skill (id or name); 0 removes it
    Team {
        event_id: String,
        skill: String,
        count: u32,
    },
}

#[derive(Subcommand)]
pub enum AddOnCmd {
    /// Add an add-on
    Add {
        service: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "0")]
        price: String,
    },
    /// Remove an add-on
    Remove { add_on_id: String },
    /// Set the price
    Price { add_on_id: String, amount: String },
}

#[derive(Subcommand)]
pub enum FinanceCmd {
    /// Set the discount (absolute amount)
    Discount { amount: String },
    /// Set the tax rate in percent; omit to clear it
    Tax { rate: Option<String> },
    /// Set the advance received
    Advance { amount: String },
    /// Set the package name
    Package { name: String },
    /// Set internal notes
    Notes { notes: String },
}

#[derive(Subcommand)]
pub enum MilestoneCmd {
    /// Add a milestone
    Add {
        name: String,
        /// percentage or fixed
        #[arg(long, default_value = "percentage")]
        kind: String,
        #[arg(long, default_value = "0")]
        value: String,
    },
    /// Remove a milestone
    Remove { milestone_id: String },
    /// Set the value (percent or amount); recomputes this milestone
    Value { milestone_id: String, value: String },
    /// Switch kind; recomputes this milestone
    Kind { milestone_id: String, kind: String },
    /// Rename a milestone
    Name { milestone_id: String, name: String },
    /// Set the due date
    Due { milestone_id: String, date: String },
    /// Record a payment
    Pay {
        milestone_id: String,
        /// Payment date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Cash, Card, UPI, Bank Transfer, Cheque, Other
        #[arg(long)]
        method: Option<String>,
        /// Reference to a payment proof
        #[arg(long)]
        proof: Option<String>,
    },
    /// Clear a recorded payment
    Unpay { milestone_id: String },
    /// Recompute every milestone against the current grand total
    Refresh,
}

// ── Edit session ──

/// Load, apply one edit, save. The edit returns a line to print. Skills the
/// edit registers in the catalog are saved with the record.
fn edit_session<F>(repo_root: &Path, key: &str, edit: F) -> anyhow::Result<Option<HistoryLog>>
where
    F: FnOnce(&mut QuoteEditor, &mut Catalog) -> anyhow::Result<String>,
{
    let (mut ws, _lock) = open_locked(repo_root)?;
    let id = ws.book.get(key)?.id.clone();
    let mut ed = ws.editor(&id)?;
    let skills_before = ws.catalog.skills.len();
    let message = edit(&mut ed, &mut ws.catalog)?;
    if ws.catalog.skills.len() != skills_before {
        ws.save_catalog()?;
    }
    let totals = ed.totals();
    let entry = ws.commit(&id, ed)?;

    println!("{message}");
    for (label, value) in totals_lines(&totals)
        .into_iter()
        .filter(|(l, _)| matches!(*l, "Grand total" | "Balance due"))
    {
        println!("  {label}: {value}");
    }
    if let Some(entry) = &entry {
        for line in entry.action.lines() {
            println!("  history: {line}");
        }
    }
    Ok(entry)
}

// ── Command Implementations ──

pub fn client(repo_root: &Path, key: &str, cmd: ClientCmd) -> anyhow::Result<()> {
    edit_session(repo_root, key, |ed, catalog| match cmd {
        ClientCmd::Set { field, value } => {
            let field: ClientField = field.parse()?;
            ed.set_client_field(field, &value);
            Ok(format!("client {field:?} updated"))
        }
        ClientCmd::Link { client_id } => {
            let master = catalog.client(&client_id)?;
            ed.link_client(master);
            Ok(format!("linked client {} ({})", master.name, master.id))
        }
        ClientCmd::Status { status } => {
            let status: QuoteStatus = status.parse()?;
            ed.set_status(status);
            Ok(format!("status: {status}"))
        }
    })?;
    Ok(())
}

pub fn event(repo_root: &Path, key: &str, cmd: EventCmd) -> anyhow::Result<()> {
    edit_session(repo_root, key, |ed, catalog| match cmd {
        EventCmd::Add {
            name,
            cost,
            duration,
        } => {
            let id = ed.add_event(EventItem {
                name: name.clone(),
                duration,
                approx_cost: quote_core::money::coerce_price(&cost),
                ..Default::default()
            });
            Ok(format!("added event {name} ({id})"))
        }
        EventCmd::Template { template_id } => {
            let template = catalog.template(&template_id)?;
            let id = ed.add_event_from_template(template);
            Ok(format!("added event {} from template ({id})", template.name))
        }
        EventCmd::Remove { event_id } => {
            let removed = ed.remove_event(&event_id)?;
            Ok(format!("removed event {}", removed.name))
        }
        EventCmd::Move { event_id, index } => {
            ed.move_event(&event_id, index)?;
            Ok(format!("moved {event_id} to position {index}"))
        }
        EventCmd::Cost { event_id, amount } => {
            let cost = ed.set_event_cost(&event_id, &amount)?;
            Ok(format!("event cost: {}", format_inr(cost)))
        }
        EventCmd::Date {
            event_id,
            date,
            time,
        } => {
            ed.set_event_date(&event_id, date.as_deref(), time.as_deref())?;
            Ok(match date {
                Some(d) => format!("event date: {d}"),
                None => "event date: to be confirmed".to_string(),
            })
        }
        EventCmd::Venue { event_id, venue } => {
            ed.set_event_venue(&event_id, venue.as_deref())?;
            Ok(match venue {
                Some(v) => format!("event venue: {v}"),
                None => "event venue: to be confirmed".to_string(),
            })
        }
        EventCmd::Name { event_id, name } => {
            ed.set_event_name(&event_id, &name)?;
            Ok(format!("event renamed: {name}"))
        }
        EventCmd::Duration { event_id, duration } => {
            ed.set_event_duration(&event_id, &duration)?;
            Ok(format!("event duration: {duration}"))
        }
        EventCmd::Notes { event_id, notes } => {
            ed.set_event_notes(&event_id, &notes)?;
            Ok("event notes updated".to_string())
        }
        EventCmd::Team {
            event_id,
            skill,
            count,
        } => {
            let known = catalog.skills.len();
            let found = if count == 0 {
                catalog.find_skill(&skill)?
            } else {
                catalog.skill_or_register(&skill)?
            };
            let (skill_id, name) = (found.id.clone(), found.name.clone());
            let registered = catalog.skills.len() != known;
            ed.set_team_member(&event_id, &skill_id, count)?;
            Ok(match (count, registered) {
                (0, _) => format!("removed {name} from team"),
                (_, true) => format!("registered skill {name} ({skill_id}); team: {count} {name}"),
                _ => format!("team: {count} {name}"),
            })
        }
    })?;
    Ok(())
}

pub fn add_on(repo_root: &Path, key: &str, cmd: AddOnCmd) -> anyhow::Result<()> {
    edit_session(repo_root, key, |ed, _| match cmd {
        AddOnCmd::Add {
            service,
            description,
            price,
        } => {
            let id = ed.add_add_on(&service, &description, &price);
            Ok(format!("added add-on {service} ({id})"))
        }
        AddOnCmd::Remove { add_on_id } => {
            let removed = ed.remove_add_on(&add_on_id)?;
            Ok(format!("removed add-on {}", removed.service))
        }
        AddOnCmd::Price { add_on_id, amount } => {
            let price = ed.set_add_on_price(&add_on_id, &amount)?;
            Ok(format!("add-on price: {}", format_inr(price)))
        }
    })?;
    Ok(())
}

pub fn finance(repo_root: &Path, key: &str, cmd: FinanceCmd) -> anyhow::Result<()> {
    edit_session(repo_root, key, |ed, _| match cmd {
        FinanceCmd::Discount { amount } => {
            let discount = ed.set_discount(&amount);
            Ok(format!("discount: {}", format_inr(discount)))
        }
        FinanceCmd::Tax { rate } => Ok(match ed.set_tax_rate(rate.as_deref()) {
            Some(r) => format!("tax rate: {}%", r.normalize()),
            None => "tax rate cleared".to_string(),
        }),
        FinanceCmd::Advance { amount } => {
            let advance = ed.set_advance(&amount);
            Ok(format!("advance: {}", format_inr(advance)))
        }
        FinanceCmd::Package { name } => {
            ed.set_package_name(&name);
            Ok(format!("package: {name}"))
        }
        FinanceCmd::Notes { notes } => {
            ed.set_financial_notes(&notes);
            Ok("financial notes updated".to_string())
        }
    })?;
    Ok(())
}

pub fn milestone(repo_root: &Path, key: &str, cmd: MilestoneCmd) -> anyhow::Result<()> {
    edit_session(repo_root, key, |ed, _| match cmd {
        MilestoneCmd::Add { name, kind, value } => {
            let kind: MilestoneKind = kind.parse()?;
            let id = ed.add_milestone(&name, kind, &value);
            let amount = ed
                .quotation()
                .milestone(&id)
                .map(|m| m.amount)
                .unwrap_or_default();
            Ok(format!("added milestone {name} ({id}): {}", format_inr(amount)))
        }
        MilestoneCmd::Remove { milestone_id } => {
            let removed = ed.remove_milestone(&milestone_id)?;
            Ok(format!("removed milestone {}", removed.name))
        }
        MilestoneCmd::Value {
            milestone_id,
            value,
        } => {
            let amount = ed.set_milestone_value(&milestone_id, &value)?;
            Ok(format!("milestone amount: {}", format_inr(amount)))
        }
        MilestoneCmd::Kind { milestone_id, kind } => {
            let kind: MilestoneKind = kind.parse()?;
            let amount = ed.set_milestone_kind(&milestone_id, kind)?;
            Ok(format!("milestone amount: {}", format_inr(amount)))
        }
        MilestoneCmd::Name { milestone_id, name } => {
            ed.set_milestone_name(&milestone_id, &name)?;
            Ok(format!("milestone renamed: {name}"))
        }
        MilestoneCmd::Due { milestone_id, date } => {
            ed.set_milestone_due(&milestone_id, &date)?;
            Ok(format!("milestone due: {date}"))
        }
        MilestoneCmd::Pay {
            milestone_id,
            date,
            method,
            proof,
        } => {
            let method = method.map(|m| m.parse::<PaymentMethod>()).transpose()?;
            let paid_at = date.unwrap_or_else(|| {
                quote_core::defaults::iso_date(quote_core::defaults::today_utc())
            });
            ed.mark_milestone_paid(&milestone_id, &paid_at, method, proof)?;
            Ok(format!("milestone paid on {paid_at}"))
        }
        MilestoneCmd::Unpay { milestone_id } => {
            ed.mark_milestone_unpaid(&milestone_id)?;
            Ok("milestone marked unpaid".to_string())
        }
        MilestoneCmd::Refresh => {
            let changed = ed.refresh_milestones();
            Ok(format!("{changed} milestone amount(s) refreshed"))
        }
    })?;
    Ok(())
}

pub fn meta(repo_root: &Path, key: &str, field: &str, value: &str) -> anyhow::Result<()> {
    let field: MetaField = field.parse()?;
    edit_session(repo_root, key, |ed, _| {
        ed.set_meta_field(field, value);
        Ok(format!("{field:?} updated"))
    })?;
    Ok(())
}
