use quote_core::{new_id, Quotation};
use serde::{Deserialize, Serialize};

/// One line of a record's audit trail.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoryLog {
    pub id: String,
    /// RFC 3339.
    pub timestamp: String,
    pub user: String,
    /// One or more change descriptions, newline separated.
    pub action: String,
}

impl HistoryLog {
    pub fn new(user: &str, action: impl Into<String>, timestamp: &str) -> Self {
        Self {
            id: new_id("log"),
            timestamp: timestamp.to_string(),
            user: user.to_string(),
            action: action.into(),
        }
    }
}

/// A stored quotation with its lifecycle timestamps and history,
/// newest history entry first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuotationRecord {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub data: Quotation,
    pub history: Vec<HistoryLog>,
}

impl QuotationRecord {
    /// Whether `key` names this record, by record id or quotation number.
    pub fn matches(&self, key: &str) -> bool {
        self.id == key || self.data.client.quote_number == key
    }

    pub fn latest_entry(&self) -> Option<&HistoryLog> {
        self.history.first()
    }
}
