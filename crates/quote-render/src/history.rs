use quote_store::QuotationRecord;

use crate::currency::display_timestamp;

/// History log of one record, newest entry first.
pub fn render_history(record: &QuotationRecord) -> String {
    let mut out = String::new();
    out.push_str("History Log\n");
    out.push_str(&format!("REF: {}\n", record.data.client.quote_number));
    if record.history.is_empty() {
        out.push_str("\n(no history)\n");
        return out;
    }
    for log in &record.history {
        out.push('\n');
        out.push_str(&format!("{}  {}\n", display_timestamp(&log.timestamp), log.user));
        for line in log.action.lines() {
            out.push_str(&format!("    {line}\n"));
        }
    }
    out
}
