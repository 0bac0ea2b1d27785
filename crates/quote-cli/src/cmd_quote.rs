use anyhow::Context;
use quote_core::defaults::{blank_quotation, new_quotation, today_utc};
use quote_core::milestone::{milestone_amount, scheduled_percentage};
use quote_core::money::HUNDRED;
use quote_core::sync::is_out_of_sync;
use quote_core::{compute_totals, MilestoneKind, QuoteEditor, Quotation, TaxMode, Totals};
use quote_render::currency::display_date;
use quote_render::{dashboard_rows, format_inr, render_dashboard, render_history, render_proposal, StudioProfile};
use quote_store::{QuotePaths, Workspace, WorkspaceLock};
use std::path::Path;

// ── Shared helpers ──

/// Open the workspace under an exclusive lock, held until the guard drops.
pub(crate) fn open_locked(repo_root: &Path) -> anyhow::Result<(Workspace, WorkspaceLock)> {
    let paths = QuotePaths::resolve(repo_root);
    paths.require_initialized()?;
    let lock = WorkspaceLock::acquire(&paths)?;
    let ws = Workspace::open(&paths.root)?;
    Ok((ws, lock))
}

pub(crate) fn totals_lines(totals: &Totals) -> Vec<(&'static str, String)> {
    let mut lines = vec![
        ("Event costs", format_inr(totals.total_event_cost)),
        ("Package after discount", format_inr(totals.package_after_discount)),
        ("Add-ons", format_inr(totals.total_add_ons)),
    ];
    if let Some(tax) = totals.tax_amount {
        lines.push(("Tax", format_inr(tax)));
    }
    lines.push(("Grand total", format_inr(totals.grand_total)));
    lines.push(("Paid", format_inr(totals.total_paid)));
    lines.push(("Balance due", format_inr(totals.balance_due)));
    lines
}

// ── new ──

/// Create a record and return its id.
fn create(repo_root: &Path, client: Option<&str>, blank: bool) -> anyhow::Result<String> {
    let (mut ws, _lock) = open_locked(repo_root)?;
    let config = ws.totals_config()?;
    let today = today_utc();
    let mut rng = rand::thread_rng();
    let mut q = if blank {
        blank_quotation(today, &mut rng)
    } else {
        new_quotation(today, &mut rng)
    };
    if config.tax == TaxMode::Exclusive {
        q.financials.tax_rate = ws.config.default_tax_rate();
    }

    let mut ed = QuoteEditor::new(q, config);
    if let Some(client_id) = client {
        ed.link_client(ws.catalog.client(client_id)?);
    }
    if config.tax == TaxMode::Exclusive && !blank {
        ed.refresh_milestones();
    }

    let user = ws.config.operator_name();
    let now = quote_store::now_rfc3339()?;
    let id = ws.book.create(ed.into_quotation(), &user, &now).id.clone();
    ws.save_book()?;
    Ok(id)
}

pub fn new(repo_root: &Path, client: Option<&str>, blank: bool) -> anyhow::Result<()> {
    let id = create(repo_root, client, blank)?;
    let ws = Workspace::open(repo_root)?;
    let record = ws.book.get(&id)?;
    println!("Created {} ({})", record.data.client.quote_number, record.id);
    Ok(())
}

// ── list / show ──

pub fn list(repo_root: &Path, json: bool) -> anyhow::Result<()> {
    let ws = Workspace::open(repo_root)?;
    let config = ws.totals_config()?;
    if json {
        let rows = dashboard_rows(ws.book.records(), &config);
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render_dashboard(ws.book.records(), &config));
    }
    Ok(())
}

fn describe(q: &Quotation, totals: &Totals) -> String {
    let mut out = String::new();
    let c = &q.client;
    out.push_str(&format!("{}  {}\n", c.quote_number, c.status));
    out.push_str(&format!("Client: {}\n", c.name));
    out.push_str(&format!(
        "Date: {}  Valid till: {}\n",
        display_date(&c.date),
        display_date(&c.valid_till)
    ));

    out.push_str("\nEvents:\n");
    if q.events.is_empty() {
        out.push_str("  (none)\n");
    }
    for e in &q.events {
        let when = if e.is_date_decided && !e.date.is_empty() {
            e.date.clone()
        } else {
            "date TBC".to_string()
        };
        out.push_str(&format!(
            "  {}  {}  {}  [{}]\n",
            e.id,
            e.name,
            format_inr(e.approx_cost),
            when
        ));
    }
    if is_out_of_sync(q) {
        out.push_str("  note: stored base amount differs from event costs; the next edit resyncs it\n");
    }

    if !q.add_ons.is_empty() {
        out.push_str("\nAdd-ons:\n");
        for a in &q.add_ons {
            out.push_str(&format!("  {}  {}  {}\n", a.id, a.service, format_inr(a.price)));
        }
    }

    let milestones = &q.financials.payment_milestones;
    if !milestones.is_empty() {
        out.push_str("\nMilestones:\n");
        for m in milestones {
            let share = match m.kind {
                MilestoneKind::Percentage => format!("{}%", m.value.normalize()),
                MilestoneKind::Fixed => "fixed".to_string(),
            };
            let mut flags = vec![if m.is_paid { "paid" } else { "pending" }];
            if milestone_amount(m.kind, m.value, totals.grand_total) != m.amount {
                flags.push("stale");
            }
            out.push_str(&format!(
                "  {}  {}  {}  {}  {}\n",
                m.id,
                m.name,
                share,
                format_inr(m.amount),
                flags.join(", ")
            ));
        }
        let scheduled = scheduled_percentage(milestones);
        if !scheduled.is_zero() && scheduled != HUNDRED {
            out.push_str(&format!(
                "  note: percentage milestones add up to {}%\n",
                scheduled.normalize()
            ));
        }
    }

    out.push_str("\nTotals:\n");
    for (label, value) in totals_lines(totals) {
        out.push_str(&format!("  {label:<24}{value}\n"));
    }
    out
}

pub fn show(repo_root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let ws = Workspace::open(repo_root)?;
    let config = ws.totals_config()?;
    let record = ws.book.get(id)?;
    let totals = compute_totals(&record.data, &config);
    if json {
        let out = serde_json::json!({ "record": record, "totals": totals });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", describe(&record.data, &totals));
    }
    Ok(())
}

// ── render / history ──

fn proposal(ws: &Workspace, id: &str) -> anyhow::Result<String> {
    let config = ws.totals_config()?;
    let record = ws.book.get(id)?;
    let totals = compute_totals(&record.data, &config);
    let profile = StudioProfile::from_config(&ws.config);
    Ok(render_proposal(&record.data, &totals, &config, &ws.catalog, &profile))
}

pub fn render(repo_root: &Path, id: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let ws = Workspace::open(repo_root)?;
    let doc = proposal(&ws, id)?;
    match output {
        Some(path) => {
            std::fs::write(path, doc.as_bytes())
                .with_context(|| format!("writing proposal: {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{doc}"),
    }
    Ok(())
}

pub fn history(repo_root: &Path, id: &str) -> anyhow::Result<()> {
    let ws = Workspace::open(repo_root)?;
    print!("{}", render_history(ws.book.get(id)?));
    Ok(())
}

// ── delete / export / import ──

pub fn delete(repo_root: &Path, id: &str) -> anyhow::Result<()> {
    let (mut ws, _lock) = open_locked(repo_root)?;
    let record = ws.book.delete(id)?;
    ws.save_book()?;
    println!("Deleted {} ({})", record.data.client.quote_number, record.id);
    Ok(())
}

pub fn export(repo_root: &Path, id: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let ws = Workspace::open(repo_root)?;
    let record = ws.book.get(id)?;
    let json = serde_json::to_string_pretty(&record.data)?;
    match output {
        Some(path) => {
            quote_store::write_atomic(path, json.as_bytes())
                .with_context(|| format!("exporting: {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn import_record(repo_root: &Path, file: &Path) -> anyhow::Result<String> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let data: Quotation = serde_json::from_str(&content)
        .with_context(|| format!("parsing quotation: {}", file.display()))?;

    let (mut ws, _lock) = open_locked(repo_root)?;
    let data = QuoteEditor::new(data, ws.totals_config()?).into_quotation();
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.display().to_string());
    let action = format!("Imported from {name}");
    let user = ws.config.operator_name();
    let now = quote_store::now_rfc3339()?;
    let id = ws.book.create_with_action(data, &user, &action, &now).id.clone();
    ws.save_book()?;
    Ok(id)
}

pub fn import(repo_root: &Path, file: &Path) -> anyhow::Result<()> {
    let id = import_record(repo_root, file)?;
    println!("Imported {} as {id}", file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_store::book::SAMPLE_ID;
    use rust_decimal::Decimal;

    fn setup() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        crate::cmd_init::execute(tmp.path()).unwrap();
        tmp
    }

    #[test]
    fn create_from_template_and_client() {
        let tmp = setup();
        let id = create(tmp.path(), Some("c2"), false).unwrap();
        let ws = Workspace::open(tmp.path()).unwrap();
        assert_eq!(ws.book.len(), 2);
        assert_eq!(ws.book.records()[0].id, id);
        let rec = ws.book.get(&id).unwrap();
        assert_eq!(rec.data.client.name, "Amit & Neha");
        assert!(rec.data.add_ons.is_empty());
        assert_eq!(rec.history[0].action, "Created new quotation");
        assert_eq!(rec.history[0].user, "Admin User");
    }

    #[test]
    fn create_blank() {
        let tmp = setup();
        let id = create(tmp.path(), None, true).unwrap();
        let ws = Workspace::open(tmp.path()).unwrap();
        let rec = ws.book.get(&id).unwrap();
        assert!(rec.data.events.is_empty());
        assert!(rec.data.client.quote_number.starts_with("QUO-"));
    }

    #[test]
    fn unknown_client_is_an_error_and_creates_nothing() {
        let tmp = setup();
        assert!(create(tmp.path(), Some("c404"), false).is_err());
        let ws = Workspace::open(tmp.path()).unwrap();
        assert_eq!(ws.book.len(), 1);
    }

    #[test]
    fn describe_flags_stale_milestones() {
        let tmp = setup();
        let ws = Workspace::open(tmp.path()).unwrap();
        let mut q = ws.book.get(SAMPLE_ID).unwrap().data.clone();
        q.events[0].approx_cost = Decimal::from(35000);
        quote_core::sync::sync_base_amount(&mut q);
        let totals = compute_totals(&q, &Default::default());
        let text = describe(&q, &totals);
        assert!(text.contains("stale"));
        assert!(text.contains("₹85,000"));
    }

    #[test]
    fn describe_notes_unsynced_base() {
        let mut q = Quotation::default();
        q.events.push(quote_core::EventItem {
            approx_cost: Decimal::from(1000),
            ..Default::default()
        });
        let totals = compute_totals(&q, &Default::default());
        assert!(describe(&q, &totals).contains("stored base amount differs"));
    }

    #[test]
    fn render_to_file() {
        let tmp = setup();
        let out = tmp.path().join("proposal.md");
        render(tmp.path(), SAMPLE_ID, Some(&out)).unwrap();
        let doc = std::fs::read_to_string(&out).unwrap();
        assert!(doc.contains("**Grand Total** | **₹75,000**"));
    }

    #[test]
    fn export_then_import_creates_new_record() {
        let tmp = setup();
        let file = tmp.path().join("export.json");
        export(tmp.path(), SAMPLE_ID, Some(&file)).unwrap();
        let id = import_record(tmp.path(), &file).unwrap();
        let ws = Workspace::open(tmp.path()).unwrap();
        let rec = ws.book.get(&id).unwrap();
        assert_eq!(rec.history[0].action, "Imported from export.json");
        assert_eq!(rec.data.financials.base_amount, Decimal::from(65000));
    }

    #[test]
    fn import_resyncs_base_amount() {
        let tmp = setup();
        let file = tmp.path().join("hand.json");
        std::fs::write(
            &file,
            r#"{"events": [{"id": "e1", "approx_cost": "12000"}], "financials": {"base_amount": 1}}"#,
        )
        .unwrap();
        let id = import_record(tmp.path(), &file).unwrap();
        let ws = Workspace::open(tmp.path()).unwrap();
        assert_eq!(
            ws.book.get(&id).unwrap().data.financials.base_amount,
            Decimal::from(12000)
        );
    }

    #[test]
    fn delete_removes_record() {
        let tmp = setup();
        delete(tmp.path(), SAMPLE_ID).unwrap();
        let ws = Workspace::open(tmp.path()).unwrap();
        assert!(ws.book.is_empty());
        assert!(delete(tmp.path(), SAMPLE_ID).is_err());
    }
}
