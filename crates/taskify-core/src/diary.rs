//! Personal diary. Newest entry first.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::next_id;
use crate::storage::PersistentStore;

pub const DIARY_KEY: &str = "diary_entries";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: i64,
    /// Long local date, e.g. "Sunday, October 18, 2026".
    pub date: String,
    pub timestamp: DateTime<Utc>,
    pub content: String,
}

/// Long human-readable date used as an entry heading.
pub fn long_date(at: DateTime<Local>) -> String {
    at.format("%A, %B %-d, %Y").to_string()
}

#[derive(Debug)]
pub struct Diary {
    store: PersistentStore,
    entries: Vec<DiaryEntry>,
}

impl Diary {
    /// Load the diary; damaged stored entries start over empty.
    pub fn load(store: PersistentStore) -> Self {
        let entries = match store.load_json::<Vec<DiaryEntry>>(DIARY_KEY) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable diary");
                Vec::new()
            }
        };
        Self { store, entries }
    }

    fn persist(&self) {
        self.store.save_json(DIARY_KEY, &self.entries);
    }

    pub fn entries(&self) -> &[DiaryEntry] {
        &self.entries
    }

    pub fn get(&self, id: i64) -> Option<&DiaryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Record an entry dated now. Blank content is ignored.
    pub fn write(&mut self, content: &str) -> Option<&DiaryEntry> {
        self.write_at(content, Local::now())
    }

    /// Record an entry dated `at`. Blank content is ignored.
    pub fn write_at(&mut self, content: &str, at: DateTime<Local>) -> Option<&DiaryEntry> {
        if content.trim().is_empty() {
            return None;
        }
        let entry = DiaryEntry {
            id: next_id(self.entries.iter().map(|e| e.id)),
            date: long_date(at),
            timestamp: at.with_timezone(&Utc),
            content: content.to_string(),
        };
        tracing::debug!(id = entry.id, "diary entry written");
        self.entries.insert(0, entry);
        self.persist();
        self.entries.first()
    }

    /// Remove an entry. Returns whether anything was removed.
    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() != before;
        if removed {
            self.persist();
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn newest_first_and_persisted() {
        let store = PersistentStore::in_memory();
        let mut diary = Diary::load(store.clone());
        let first = diary.write("day one").unwrap().id;
        let second = diary.write("day two").unwrap().id;

        let ids: Vec<i64> = diary.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second, first]);

        let reloaded = Diary::load(store);
        assert_eq!(reloaded.entries(), diary.entries());
    }

    #[test]
    fn blank_entries_ignored() {
        let mut diary = Diary::load(PersistentStore::in_memory());
        assert!(diary.write(" \n\t").is_none());
        assert!(diary.entries().is_empty());
    }

    #[test]
    fn entry_has_long_date_and_utc_timestamp() {
        let at = Local.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        let mut diary = Diary::load(PersistentStore::in_memory());
        let entry = diary.write_at("multi\nline", at).unwrap().clone();
        assert_eq!(entry.date, "Sunday, October 18, 2026");
        assert_eq!(entry.timestamp, at.with_timezone(&Utc));
        assert_eq!(entry.content, "multi\nline");
    }

    #[test]
    fn delete_entry() {
        let mut diary = Diary::load(PersistentStore::in_memory());
        let id = diary.write("gone soon").unwrap().id;
        assert!(diary.delete(id));
        assert!(!diary.delete(id));
        assert!(diary.get(id).is_none());
    }

    #[test]
    fn reads_entries_with_millisecond_timestamps() {
        let store = PersistentStore::in_memory();
        store.set(
            DIARY_KEY,
            r#"[{"id":1,"date":"Monday, January 5, 2026","timestamp":"2026-01-05T08:00:00.000Z","content":"hi"}]"#,
        );
        let diary = Diary::load(store);
        assert_eq!(diary.entries().len(), 1);
        assert_eq!(diary.entries()[0].content, "hi");
    }
}
