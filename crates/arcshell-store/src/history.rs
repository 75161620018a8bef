//! Visit history: append-only, oldest first.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// A single visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
    pub timestamp: String,
}

/// Visit log. Repeat visits to a URL each get their own entry.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    pub fn add(&mut self, url: &str, title: &str, timestamp: &str) {
        self.entries.push(HistoryEntry {
            url: url.to_string(),
            title: title.to_string(),
            timestamp: timestamp.to_string(),
        });
    }

    /// Append a visit stamped with the current UTC time.
    pub fn record_visit(&mut self, url: &str, title: &str) {
        let stamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string());
        self.add(url, title, &stamp);
    }

    pub fn list(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
