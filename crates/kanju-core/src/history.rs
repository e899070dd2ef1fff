//! Capped, URL-deduplicated watch history.
//!
//! The whole collection lives as one JSON array in a single storage slot and
//! every mutation is a read-modify-write of that slot. New URLs go to the
//! front; re-watching a known URL refreshes its timestamp but leaves it where
//! it is.

use chrono::{DateTime, Utc};
use kanju_parse::VideoMeta;

use crate::kv::KeyValueStore;
use crate::models::WatchRecord;

/// Default storage slot for the serialized history.
pub const STORAGE_KEY: &str = "videoHistory";

/// Most records kept; older entries fall off the tail.
pub const HISTORY_LIMIT: usize = 20;

/// What an upsert did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new record was put at the front.
    Inserted,
    /// An existing record had its `last_watch` refreshed in place.
    Touched,
}

pub struct HistoryStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Record a watch of `url` now.
    pub fn upsert(&mut self, url: &str, meta: &VideoMeta) -> UpsertOutcome {
        self.upsert_at(url, meta, Utc::now())
    }

    /// Record a watch of `url` at `now`.
    ///
    /// A known URL only gets its timestamp refreshed; title, episode, note
    /// and position stay as they were.
    pub fn upsert_at(
        &mut self,
        url: &str,
        meta: &VideoMeta,
        now: DateTime<Utc>,
    ) -> UpsertOutcome {
        let mut records = self.load();

        let outcome = match records.iter_mut().find(|r| r.url == url) {
            Some(existing) => {
                existing.last_watch = now;
                UpsertOutcome::Touched
            }
            None => {
                records.insert(0, WatchRecord::new(url, meta, now));
                records.truncate(HISTORY_LIMIT);
                UpsertOutcome::Inserted
            }
        };

        tracing::debug!(url, ?outcome, len = records.len(), "History upsert");
        self.persist(&records);
        outcome
    }

    /// All records in stored order (newest insert first).
    pub fn list(&self) -> Vec<WatchRecord> {
        self.load()
    }

    pub fn get(&self, index: usize) -> Option<WatchRecord> {
        self.load().into_iter().nth(index)
    }

    /// Overwrite the note of the record at `index`.
    ///
    /// Returns `false` without touching storage when `index` is out of range.
    pub fn set_note(&mut self, index: usize, note: &str) -> bool {
        let mut records = self.load();
        let Some(record) = records.get_mut(index) else {
            tracing::debug!(index, len = records.len(), "Note index out of range, ignoring");
            return false;
        };
        record.note = note.to_string();
        self.persist(&records);
        true
    }

    pub fn clear(&mut self) {
        self.persist(&[]);
    }

    /// Serialized form of the stored collection, pretty-printed.
    pub fn export_json(&self) -> String {
        serde_json::to_string_pretty(&self.load()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Read the collection; a missing or corrupt slot reads as empty.
    fn load(&self) -> Vec<WatchRecord> {
        let Some(raw) = self.store.get(&self.key) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    error = %e,
                    "Corrupt history slot, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Write the collection. Failures are logged, not retried or returned.
    fn persist(&mut self, records: &[WatchRecord]) {
        let json = match serde_json::to_string(records) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize history: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.key, &json) {
            tracing::warn!(key = %self.key, "Failed to save history: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{FileStore, MemoryStore};
    use chrono::{Duration, TimeZone};

    fn meta(title: &str, episode: &str) -> VideoMeta {
        VideoMeta {
            title: title.into(),
            episode: episode.into(),
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn store() -> HistoryStore<MemoryStore> {
        HistoryStore::new(MemoryStore::new())
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        assert!(store().list().is_empty());
    }

    #[test]
    fn test_insert_builds_record() {
        let mut history = store();
        let outcome = history.upsert_at("https://x.com/show-1集", &meta("show", "第1集"), t0());
        assert_eq!(outcome, UpsertOutcome::Inserted);

        let records = history.list();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "show");
        assert_eq!(records[0].episode, "第1集");
        assert!(records[0].note.is_empty());
        assert_eq!(records[0].last_watch, t0());
    }

    #[test]
    fn test_same_url_twice_only_touches_timestamp() {
        let mut history = store();
        let url = "https://x.com/a";
        history.upsert_at(url, &meta("first", "第1集"), t0());
        assert!(history.set_note(0, "left off at 12:00"));

        let later = t0() + Duration::hours(2);
        let outcome = history.upsert_at(url, &meta("second", "第2集"), later);
        assert_eq!(outcome, UpsertOutcome::Touched);

        let records = history.list();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "first");
        assert_eq!(records[0].episode, "第1集");
        assert_eq!(records[0].note, "left off at 12:00");
        assert_eq!(records[0].last_watch, later);
    }

    #[test]
    fn test_touch_does_not_move_record_to_front() {
        let mut history = store();
        history.upsert_at("https://x.com/a", &meta("aa", ""), t0());
        history.upsert_at("https://x.com/b", &meta("bb", ""), t0());
        history.upsert_at("https://x.com/a", &meta("aa", ""), t0() + Duration::minutes(5));

        let urls: Vec<_> = history.list().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, ["https://x.com/b", "https://x.com/a"]);
    }

    #[test]
    fn test_cap_drops_first_inserted() {
        let mut history = store();
        for i in 0..=HISTORY_LIMIT {
            let url = format!("https://x.com/v/{i}");
            history.upsert_at(&url, &meta("show", ""), t0() + Duration::seconds(i as i64));
        }

        let records = history.list();
        assert_eq!(records.len(), HISTORY_LIMIT);
        assert_eq!(records[0].url, format!("https://x.com/v/{HISTORY_LIMIT}"));
        assert!(records.iter().all(|r| r.url != "https://x.com/v/0"));
    }

    #[test]
    fn test_clear_empties_list() {
        let mut history = store();
        history.upsert_at("https://x.com/a", &meta("aa", ""), t0());
        history.clear();
        assert!(history.list().is_empty());
        assert_eq!(history.store().get(STORAGE_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn test_set_note() {
        let mut history = store();
        history.upsert_at("https://x.com/a", &meta("aa", ""), t0());
        assert!(history.set_note(0, "x"));
        assert_eq!(history.list()[0].note, "x");
    }

    #[test]
    fn test_set_note_out_of_range_is_noop() {
        let mut history = store();
        history.upsert_at("https://x.com/a", &meta("aa", ""), t0());
        let before = history.store().get(STORAGE_KEY);

        assert!(!history.set_note(999, "x"));
        assert_eq!(history.store().get(STORAGE_KEY), before);
    }

    #[test]
    fn test_set_note_on_empty_store_writes_nothing() {
        let mut history = store();
        assert!(!history.set_note(0, "x"));
        assert!(history.store().get(STORAGE_KEY).is_none());
    }

    #[test]
    fn test_corrupt_slot_reads_empty() {
        let mut backing = MemoryStore::new();
        backing.set(STORAGE_KEY, "{not json").unwrap();
        let mut history = HistoryStore::new(backing);
        assert!(history.list().is_empty());

        // The next write replaces the corrupt blob.
        history.upsert_at("https://x.com/a", &meta("aa", ""), t0());
        assert_eq!(history.list().len(), 1);
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let mut history = store();
        history.upsert_at("https://x.com/a", &meta("aa", ""), t0());
        history.store_mut().set_read_only(true);

        let outcome = history.upsert_at("https://x.com/b", &meta("bb", ""), t0());
        assert_eq!(outcome, UpsertOutcome::Inserted);
        history.clear();

        let urls: Vec<_> = history.list().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, ["https://x.com/a"]);
    }

    #[test]
    fn test_custom_key() {
        let mut history = HistoryStore::with_key(MemoryStore::new(), "otherSlot");
        history.upsert_at("https://x.com/a", &meta("aa", ""), t0());
        assert!(history.store().get("otherSlot").is_some());
        assert!(history.store().get(STORAGE_KEY).is_none());
    }

    #[test]
    fn test_get_by_index() {
        let mut history = store();
        history.upsert_at("https://x.com/a", &meta("aa", ""), t0());
        history.upsert_at("https://x.com/b", &meta("bb", ""), t0());
        assert_eq!(history.get(1).unwrap().url, "https://x.com/a");
        assert!(history.get(2).is_none());
    }

    #[test]
    fn test_export_json_matches_wire_format() {
        let mut history = store();
        history.upsert_at("https://x.com/a", &meta("aa", "第2集"), t0());
        let exported: serde_json::Value = serde_json::from_str(&history.export_json()).unwrap();
        assert_eq!(exported[0]["lastWatch"], "2024-05-01T12:00:00.000Z");
        assert_eq!(exported[0]["episode"], "第2集");
    }

    #[test]
    fn test_file_backed_history_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut history = HistoryStore::new(FileStore::new(dir.path()));
            history.upsert_at("https://x.com/a", &meta("aa", ""), t0());
            history.set_note(0, "keep");
        }
        let reopened = HistoryStore::new(FileStore::new(dir.path()));
        let records = reopened.list();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].note, "keep");
    }
}
