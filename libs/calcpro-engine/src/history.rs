//! Bounded calculation history
//!
//! Entries are kept newest first. Recording past [`HISTORY_CAPACITY`] drops
//! the oldest entries; nothing ever reorders or mutates a stored entry.

use crate::error::{CalcError, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, info};

/// Maximum number of retained history entries
pub const HISTORY_CAPACITY: usize = 100;

/// Surface that produced a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Basic,
    Scientific,
    Unit,
    Currency,
    Statistical,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Scientific => "scientific",
            Self::Unit => "unit",
            Self::Currency => "currency",
            Self::Statistical => "statistical",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub expression: String,
    /// Pre-formatted result
    pub result: String,
    /// Local wall-clock time, `HH:MM:SS`
    pub timestamp: String,
    #[serde(rename = "type")]
    pub category: Category,
}

impl HistoryEntry {
    pub fn new(
        expression: impl Into<String>,
        result: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            category,
        }
    }
}

/// Per-category usage counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsageStats {
    pub total: usize,
    pub basic: usize,
    pub scientific: usize,
    /// Unit and currency conversions combined
    pub conversions: usize,
    pub statistical: usize,
}

impl UsageStats {
    /// Share of `count` in the total, rounded to a whole percent
    pub fn percent(&self, count: usize) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (count as f64 / self.total as f64 * 100.0).round() as u32
    }
}

/// Newest-first, capped calculation log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored entries (newest first), applying the cap
    pub fn from_entries(entries: impl IntoIterator<Item = HistoryEntry>) -> Self {
        let mut history = Self {
            entries: entries.into_iter().collect(),
        };
        history.trim();
        history
    }

    /// Prepend a new entry with the current timestamp
    pub fn record(
        &mut self,
        expression: impl Into<String>,
        result: impl Into<String>,
        category: Category,
    ) -> &HistoryEntry {
        self.push(HistoryEntry::new(expression, result, category))
    }

    /// Prepend an already built entry
    pub fn push(&mut self, entry: HistoryEntry) -> &HistoryEntry {
        debug!(
            expression = %entry.expression,
            result = %entry.result,
            category = %entry.category,
            "history recorded"
        );
        self.entries.push_front(entry);
        self.trim();
        &self.entries[0]
    }

    /// Drop entries beyond the cap, oldest first
    pub fn trim(&mut self) {
        if self.entries.len() > HISTORY_CAPACITY {
            let dropped = self.entries.len() - HISTORY_CAPACITY;
            self.entries.truncate(HISTORY_CAPACITY);
            debug!(dropped, "history trimmed");
        }
    }

    pub fn clear(&mut self) {
        let cleared = self.entries.len();
        self.entries.clear();
        info!(cleared, "history cleared");
    }

    /// Entries newest first
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn usage(&self) -> UsageStats {
        let mut stats = UsageStats {
            total: self.entries.len(),
            ..UsageStats::default()
        };
        for entry in &self.entries {
            match entry.category {
                Category::Basic => stats.basic += 1,
                Category::Scientific => stats.scientific += 1,
                Category::Unit | Category::Currency => stats.conversions += 1,
                Category::Statistical => stats.statistical += 1,
            }
        }
        stats
    }

    /// Plain-text listing, newest first
    pub fn export_text(&self) -> Result<String> {
        if self.entries.is_empty() {
            return Err(CalcError::history("No calculations to export"));
        }

        let mut out = String::new();
        out.push_str("Calculator Pro+ - History Export\n");
        out.push_str(&format!(
            "Generated: {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!("Total Calculations: {}\n\n", self.entries.len()));

        for (i, entry) in self.entries.iter().enumerate() {
            out.push_str(&format!(
                "{}. {} = {}\n   Type: {} | Time: {}\n\n",
                i + 1,
                entry.expression,
                entry.result,
                entry.category,
                entry.timestamp
            ));
        }
        Ok(out)
    }
}

/// File name for a history export made on `date`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("calculator-history-{}.txt", date.format("%Y-%m-%d"))
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_record_prepends() {
        let mut history = History::new();
        history.record("1+1", "2", Category::Basic);
        history.record("√(9)", "3", Category::Scientific);

        let expressions: Vec<_> = history.entries().map(|e| e.expression.as_str()).collect();
        assert_eq!(expressions, vec!["√(9)", "1+1"]);
        assert_eq!(history.latest().unwrap().result, "3");
    }

    #[test]
    fn test_capacity() {
        let mut history = History::new();
        for i in 0..150 {
            history.record(format!("{}+0", i), i.to_string(), Category::Basic);
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.latest().unwrap().result, "149");
        assert_eq!(history.entries().last().unwrap().result, "50");
    }

    #[test]
    fn test_timestamp_format() {
        let entry = HistoryEntry::new("2+2", "4", Category::Basic);
        let parts: Vec<_> = entry.timestamp.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.len() == 2));
    }

    #[test]
    fn test_export_text() {
        let mut history = History::new();
        assert_eq!(history.export_text().unwrap_err().kind(), ErrorKind::History);

        history.record("2+3", "5", Category::Basic);
        history.record("10 m", "32.808400 ft", Category::Unit);

        let text = history.export_text().unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Calculator Pro+ - History Export");
        assert!(lines[1].starts_with("Generated: "));
        assert_eq!(lines[2], "Total Calculations: 2");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "1. 10 m = 32.808400 ft");
        assert!(lines[5].starts_with("   Type: unit | Time: "));
        assert_eq!(lines[7], "2. 2+3 = 5");
        assert!(lines[8].starts_with("   Type: basic | Time: "));
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "calculator-history-2024-03-07.txt");
    }

    #[test]
    fn test_usage() {
        let mut history = History::new();
        history.record("1+1", "2", Category::Basic);
        history.record("1+2", "3", Category::Basic);
        history.record("sin(0)", "0", Category::Scientific);
        history.record("1 USD", "0.85 EUR", Category::Currency);
        history.record("1 m", "100.000000 cm", Category::Unit);
        history.record("add 4", "mean 4.0000 (n=1)", Category::Statistical);

        let usage = history.usage();
        assert_eq!(usage.total, 6);
        assert_eq!(usage.basic, 2);
        assert_eq!(usage.conversions, 2);
        assert_eq!(usage.percent(usage.basic), 33);
        assert_eq!(usage.percent(usage.statistical), 17);
        assert_eq!(UsageStats::default().percent(0), 0);
    }

    #[test]
    fn test_serde_shape() {
        let mut history = History::new();
        history.record("2+2", "4", Category::Basic);

        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["type"], "basic");

        let restored: History = serde_json::from_value(json).unwrap();
        assert_eq!(restored, history);
    }

    #[test]
    fn test_from_entries_applies_cap() {
        let entries =
            (0..120).map(|i| HistoryEntry::new(i.to_string(), i.to_string(), Category::Basic));
        let history = History::from_entries(entries);
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.latest().unwrap().expression, "0");
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.record("1+1", "2", Category::Basic);
        history.clear();
        assert!(history.is_empty());
    }
}
