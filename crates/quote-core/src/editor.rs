//! Field-level editing of an owned quotation.
//!
//! `QuoteEditor` is the only mutation path the front end uses. Two hooks run
//! inside the editor before any method returns:
//!
//! - every event-list mutation re-syncs `financials.base_amount`
//!   (write-if-changed, see [`crate::sync`]);
//! - editing a milestone's kind or value recomputes that milestone's amount
//!   against the grand total of that moment. Other milestones are left alone
//!   until they are edited or [`QuoteEditor::refresh_milestones`] is called.
//!
//! Numeric input arrives as raw text and is coerced, never rejected.

use rust_decimal::Decimal;

use crate::catalog::{ClientMaster, EventTemplate};
use crate::error::CoreError;
use crate::milestone;
use crate::money::{coerce, coerce_price, non_negative};
use crate::sync::sync_base_amount;
use crate::totals::{compute_totals, Totals, TotalsConfig};
use crate::types::*;

#[derive(Debug, Clone)]
pub struct QuoteEditor {
    quotation: Quotation,
    config: TotalsConfig,
}

impl QuoteEditor {
    /// Open a quotation for editing. The base amount is synced on open.
    pub fn new(mut quotation: Quotation, config: TotalsConfig) -> Self {
        sync_base_amount(&mut quotation);
        Self { quotation, config }
    }

    pub fn quotation(&self) -> &Quotation {
        &self.quotation
    }

    pub fn config(&self) -> &TotalsConfig {
        &self.config
    }

    pub fn totals(&self) -> Totals {
        compute_totals(&self.quotation, &self.config)
    }

    pub fn into_quotation(self) -> Quotation {
        self.quotation
    }

    // ── Client ──

    pub fn set_client_name(&mut self, name: &str) {
        self.quotation.client.name = name.to_string();
    }

    pub fn set_client_field(&mut self, field: ClientField, value: &str) {
        *field.slot(&mut self.quotation.client) = value.to_string();
    }

    pub fn set_status(&mut self, status: QuoteStatus) {
        self.quotation.client.status = status;
    }

    pub fn link_client(&mut self, master: &ClientMaster) {
        master.apply_to(&mut self.quotation.client);
    }

    // ── Events ──

    fn with_events<T>(&mut self, f: impl FnOnce(&mut Vec<EventItem>) -> T) -> T {
        let out = f(&mut self.quotation.events);
        sync_base_amount(&mut self.quotation);
        out
    }

    fn with_event<T>(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut EventItem) -> T,
    ) -> Result<T, CoreError> {
        self.with_events(|events| {
            events
                .iter_mut()
                .find(|e| e.id == id)
                .map(f)
                .ok_or_else(|| CoreError::EventNotFound(id.to_string()))
        })
    }

    /// Append an event. An empty id is replaced with a generated one.
    pub fn add_event(&mut self, mut event: EventItem) -> String {
        if event.id.is_empty() {
            event.id = new_id("evt");
        }
        event.approx_cost = non_negative(event.approx_cost);
        let id = event.id.clone();
        self.with_events(|events| events.push(event));
        id
    }

    pub fn add_event_from_template(&mut self, template: &EventTemplate) -> String {
        self.add_event(template.instantiate())
    }

    pub fn remove_event(&mut self, id: &str) -> Result<EventItem, CoreError> {
        self.with_events(|events| {
            let idx = events
                .iter()
                .position(|e| e.id == id)
                .ok_or_else(|| CoreError::EventNotFound(id.to_string()))?;
            Ok(events.remove(idx))
        })
    }

    /// Move an event to `index` in display order.
    pub fn move_event(&mut self, id: &str, index: usize) -> Result<(), CoreError> {
        self.with_events(|events| {
            let from = events
                .iter()
                .position(|e| e.id == id)
                .ok_or_else(|| CoreError::EventNotFound(id.to_string()))?;
            if index >= events.len() {
                return Err(CoreError::PositionOutOfRange {
                    index,
                    len: events.len(),
                });
            }
            let ev = events.remove(from);
            events.insert(index, ev);
            Ok(())
        })
    }

    /// Replace the whole event list in one step.
    pub fn replace_events(&mut self, events: Vec<EventItem>) {
        self.with_events(|list| {
            *list = events;
            for e in list.iter_mut() {
                e.approx_cost = non_negative(e.approx_cost);
            }
        });
    }

    /// Set an event's cost from raw input; returns the stored value.
    pub fn set_event_cost(&mut self, id: &str, raw: &str) -> Result<Decimal, CoreError> {
        let cost = coerce_price(raw);
        self.with_event(id, |e| {
            e.approx_cost = cost;
            cost
        })
    }

    pub fn set_event_name(&mut self, id: &str, name: &str) -> Result<(), CoreError> {
        self.with_event(id, |e| e.name = name.to_string())
    }

    pub fn set_event_duration(&mut self, id: &str, duration: &str) -> Result<(), CoreError> {
        self.with_event(id, |e| e.duration = duration.to_string())
    }

    pub fn set_event_notes(&mut self, id: &str, notes: &str) -> Result<(), CoreError> {
        self.with_event(id, |e| e.notes = notes.to_string())
    }

    /// `Some(date)` marks the date decided; `None` marks it undecided and
    /// keeps whatever was typed before.
    pub fn set_event_date(
        &mut self,
        id: &str,
        date: Option<&str>,
        time_range: Option<&str>,
    ) -> Result<(), CoreError> {
        self.with_event(id, |e| match date {
            Some(d) => {
                e.is_date_decided = true;
                e.date = d.to_string();
                if let Some(t) = time_range {
                    e.time_range = t.to_string();
                }
            }
            None => e.is_date_decided = false,
        })
    }

    pub fn set_event_venue(&mut self, id: &str, venue: Option<&str>) -> Result<(), CoreError> {
        self.with_event(id, |e| match venue {
            Some(v) => {
                e.is_venue_decided = true;
                e.venue = v.to_string();
            }
            None => e.is_venue_decided = false,
        })
    }

    /// Set the headcount for a skill on an event. Zero removes the skill.
    /// A skill appears at most once per event team.
    pub fn set_team_member(
        &mut self,
        event_id: &str,
        skill_id: &str,
        count: u32,
    ) -> Result<(), CoreError> {
        self.with_event(event_id, |e| {
            match e.team.iter().position(|m| m.skill_id == skill_id) {
                Some(i) if count == 0 => {
                    e.team.remove(i);
                }
                Some(i) => e.team[i].count = count,
                None if count == 0 => {}
                None => e.team.push(TeamMember {
                    skill_id: skill_id.to_string(),
                    count,
                }),
            }
        })
    }

    // ── Add-ons ──

    fn add_on_mut(&mut self, id: &str) -> Result<&mut AddOn, CoreError> {
        self.quotation
            .add_ons
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| CoreError::AddOnNotFound(id.to_string()))
    }

    pub fn add_add_on(&mut self, service: &str, description: &str, raw_price: &str) -> String {
        let id = new_id("add");
        self.quotation.add_ons.push(AddOn {
            id: id.clone(),
            service: service.to_string(),
            description: description.to_string(),
            price: coerce_price(raw_price),
        });
        id
    }

    pub fn remove_add_on(&mut self, id: &str) -> Result<AddOn, CoreError> {
        let idx = self
            .quotation
            .add_ons
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| CoreError::AddOnNotFound(id.to_string()))?;
        Ok(self.quotation.add_ons.remove(idx))
    }

    pub fn set_add_on_price(&mut self, id: &str, raw: &str) -> Result<Decimal, CoreError> {
        let price = coerce_price(raw);
        self.add_on_mut(id)?.price = price;
        Ok(price)
    }

    pub fn set_add_on_text(
        &mut self,
        id: &str,
        service: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), CoreError> {
        let a = self.add_on_mut(id)?;
        if let Some(s) = service {
            a.service = s.to_string();
        }
        if let Some(d) = description {
            a.description = d.to_string();
        }
        Ok(())
    }

    // ── Financials ──

    pub fn set_package_name(&mut self, name: &str) {
        self.quotation.financials.package_name = name.to_string();
    }

    /// Discount is not clamped: a discount above the base amount is allowed.
    pub fn set_discount(&mut self, raw: &str) -> Decimal {
        let discount = coerce(raw);
        self.quotation.financials.discount = discount;
        discount
    }

    /// `None` clears the rate.
    pub fn set_tax_rate(&mut self, raw: Option<&str>) -> Option<Decimal> {
        let rate = raw.map(coerce);
        self.quotation.financials.tax_rate = rate;
        rate
    }

    pub fn set_advance(&mut self, raw: &str) -> Decimal {
        let advance = coerce(raw);
        self.quotation.financials.advance_amount = advance;
        advance
    }

    pub fn set_financial_notes(&mut self, notes: &str) {
        self.quotation.financials.notes = notes.to_string();
    }

    // ── Milestones ──

    fn milestone_mut(&mut self, id: &str) -> Result<&mut PaymentMilestone, CoreError> {
        self.quotation
            .financials
            .payment_milestones
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| CoreError::MilestoneNotFound(id.to_string()))
    }

    /// Recompute one milestone against the current grand total.
    fn recalculate_milestone(&mut self, id: &str) -> Result<Decimal, CoreError> {
        let grand_total = self.totals().grand_total;
        let m = self.milestone_mut(id)?;
        milestone::recalculate(m, grand_total);
        Ok(m.amount)
    }

    /// Append a milestone; its amount is computed immediately.
    pub fn add_milestone(&mut self, name: &str, kind: MilestoneKind, raw_value: &str) -> String {
        let id = new_id("pm");
        let grand_total = self.totals().grand_total;
        let value = coerce(raw_value);
        self.quotation
            .financials
            .payment_milestones
            .push(PaymentMilestone {
                id: id.clone(),
                name: name.to_string(),
                kind,
                value,
                amount: milestone::milestone_amount(kind, value, grand_total),
                ..Default::default()
            });
        id
    }

    pub fn remove_milestone(&mut self, id: &str) -> Result<PaymentMilestone, CoreError> {
        let list = &mut self.quotation.financials.payment_milestones;
        let idx = list
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| CoreError::MilestoneNotFound(id.to_string()))?;
        Ok(list.remove(idx))
    }

    /// Set a milestone's value from raw input; returns the new amount.
    pub fn set_milestone_value(&mut self, id: &str, raw: &str) -> Result<Decimal, CoreError> {
        self.milestone_mut(id)?.value = coerce(raw);
        self.recalculate_milestone(id)
    }

    /// Switch a milestone between percentage and fixed; returns the new amount.
    pub fn set_milestone_kind(&mut self, id: &str, kind: MilestoneKind) -> Result<Decimal, CoreError> {
        self.milestone_mut(id)?.kind = kind;
        self.recalculate_milestone(id)
    }

    pub fn set_milestone_name(&mut self, id: &str, name: &str) -> Result<(), CoreError> {
        self.milestone_mut(id)?.name = name.to_string();
        Ok(())
    }

    pub fn set_milestone_due(&mut self, id: &str, due_date: &str) -> Result<(), CoreError> {
        self.milestone_mut(id)?.due_date = due_date.to_string();
        Ok(())
    }

    /// Record a payment against a milestone. The amount is not recomputed.
    pub fn mark_milestone_paid(
        &mut self,
        id: &str,
        paid_at: &str,
        method: Option<PaymentMethod>,
        proof: Option<String>,
    ) -> Result<(), CoreError> {
        let m = self.milestone_mut(id)?;
        m.is_paid = true;
        m.paid_at = Some(paid_at.to_string());
        m.method = method;
        if proof.is_some() {
            m.proof = proof;
        }
        Ok(())
    }

    pub fn mark_milestone_unpaid(&mut self, id: &str) -> Result<(), CoreError> {
        let m = self.milestone_mut(id)?;
        m.is_paid = false;
        m.paid_at = None;
        m.method = None;
        m.proof = None;
        Ok(())
    }

    /// Recompute every milestone against the current grand total.
    /// Returns how many amounts changed.
    pub fn refresh_milestones(&mut self) -> usize {
        let grand_total = self.totals().grand_total;
        milestone::refresh_all(&mut self.quotation.financials.payment_milestones, grand_total)
    }

    // ── Terms ──

    pub fn set_meta_field(&mut self, field: MetaField, value: &str) {
        *field.slot(&mut self.quotation.meta) = value.to_string();
    }
}
