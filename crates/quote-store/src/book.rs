use anyhow::Context;
use quote_core::{new_id, Quotation};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::StoreError;
use crate::history::{digest_entry, CREATED_ACTION};
use crate::record::{HistoryLog, QuotationRecord};

/// Id and history text of the record seeded by `quote init`.
pub const SAMPLE_ID: &str = "Q-SAMPLE-001";
pub const SAMPLE_ACTION: &str = "Initial Quotation Created";
pub const SYSTEM_USER: &str = "System";

/// The active quotation list, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RecordBook {
    records: Vec<QuotationRecord>,
}

impl RecordBook {
    /// Load from `quotations.json`. A missing file is an empty book.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading quotations: {}", path.display()))?;
        let book: RecordBook = serde_json::from_str(&content)
            .with_context(|| format!("parsing quotations: {}", path.display()))?;
        tracing::debug!(path = %path.display(), records = book.len(), "loaded record book");
        Ok(book)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        crate::write_atomic(path, data.as_bytes())
            .with_context(|| format!("saving quotations: {}", path.display()))?;
        tracing::debug!(path = %path.display(), records = self.len(), "saved record book");
        Ok(())
    }

    pub fn records(&self) -> &[QuotationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look a record up by id or quotation number.
    pub fn get(&self, key: &str) -> Result<&QuotationRecord, StoreError> {
        self.records
            .iter()
            .find(|r| r.matches(key))
            .ok_or_else(|| StoreError::RecordNotFound(key.to_string()))
    }

    fn position(&self, key: &str) -> Result<usize, StoreError> {
        self.records
            .iter()
            .position(|r| r.matches(key))
            .ok_or_else(|| StoreError::RecordNotFound(key.to_string()))
    }

    fn push_front(&mut self, record: QuotationRecord) -> &QuotationRecord {
        tracing::info!(id = %record.id, quote = %record.data.client.quote_number, "record created");
        self.records.insert(0, record);
        &self.records[0]
    }

    /// Add a new record at the top of the list with a creation entry.
    pub fn create(&mut self, data: Quotation, user: &str, timestamp: &str) -> &QuotationRecord {
        self.create_with_action(data, user, CREATED_ACTION, timestamp)
    }

    pub fn create_with_action(
        &mut self,
        data: Quotation,
        user: &str,
        action: &str,
        timestamp: &str,
    ) -> &QuotationRecord {
        self.push_front(QuotationRecord {
            id: new_id("quo"),
            created_at: timestamp.to_string(),
            updated_at: timestamp.to_string(),
            data,
            history: vec![HistoryLog::new(user, action, timestamp)],
        })
    }

    /// Seed the sample record. No-op when the book already has records.
    pub fn seed_sample(&mut self, data: Quotation, timestamp: &str) -> bool {
        if !self.is_empty() {
            return false;
        }
        self.push_front(QuotationRecord {
            id: SAMPLE_ID.to_string(),
            created_at: timestamp.to_string(),
            updated_at: timestamp.to_string(),
            data,
            history: vec![HistoryLog::new(SYSTEM_USER, SAMPLE_ACTION, timestamp)],
        });
        true
    }

    /// Store a new snapshot for an existing record.
    ///
    /// The snapshot and `updated_at` are replaced unconditionally; a history
    /// entry is prepended only when a watched field changed. Returns that
    /// entry, if any.
    pub fn commit(
        &mut self,
        key: &str,
        data: Quotation,
        user: &str,
        timestamp: &str,
    ) -> Result<Option<&HistoryLog>, StoreError> {
        let idx = self.position(key)?;
        let record = &mut self.records[idx];
        let entry = digest_entry(&record.data, &data, user, timestamp);
        record.data = data;
        record.updated_at = timestamp.to_string();
        match entry {
            Some(entry) => {
                tracing::debug!(id = %record.id, action = %entry.action, "history entry");
                record.history.insert(0, entry);
                Ok(record.history.first())
            }
            None => Ok(None),
        }
    }

    pub fn delete(&mut self, key: &str) -> Result<QuotationRecord, StoreError> {
        let idx = self.position(key)?;
        let record = self.records.remove(idx);
        tracing::info!(id = %record.id, "record deleted");
        Ok(record)
    }
}
