use quote_core::{compute_totals, QuoteStatus, TotalsConfig};
use quote_store::QuotationRecord;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::currency::{display_timestamp_date, format_inr};

/// One line of the quotation list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardRow {
    pub id: String,
    pub quote_number: String,
    pub client: String,
    pub created: String,
    pub grand_total: Decimal,
    pub status: QuoteStatus,
}

pub fn dashboard_rows(records: &[QuotationRecord], config: &TotalsConfig) -> Vec<DashboardRow> {
    records
        .iter()
        .map(|r| DashboardRow {
            id: r.id.clone(),
            quote_number: r.data.client.quote_number.clone(),
            client: r.data.client.name.clone(),
            created: display_timestamp_date(&r.created_at),
            grand_total: compute_totals(&r.data, config).grand_total,
            status: r.data.client.status,
        })
        .collect()
}

/// Plain-text table of all records, in list order.
pub fn render_dashboard(records: &[QuotationRecord], config: &TotalsConfig) -> String {
    if records.is_empty() {
        return "No quotations found. Create one to get started.\n".to_string();
    }
    let header = ["ID", "QUOTATION", "CLIENT", "DATE", "AMOUNT", "STATUS"];
    let rows: Vec<[String; 6]> = dashboard_rows(records, config)
        .into_iter()
        .map(|r| {
            [
                r.id,
                r.quote_number,
                r.client,
                r.created,
                format_inr(r.grand_total),
                r.status.to_string(),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: &[&str]| {
        let line: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| format!("{c}{}", " ".repeat(w - c.chars().count())))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };
    push_row(&header[..]);
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        push_row(&cells);
    }
    out
}
