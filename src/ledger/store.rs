//! Entry store
//!
//! Records live as one JSON array under `dailyEntries` in a key/value store.
//! The browser's local storage is the real backend; [`MemoryStore`] stands
//! in for it outside the browser.

use std::cell::RefCell;
use std::collections::HashMap;

use super::entry::{Entry, Record, Timestamp, Tombstone};
use super::error::{StoreError, StoreResult};

/// Key holding the record list
pub const ENTRIES_KEY: &str = "dailyEntries";
/// Key holding the etag of the last synced document
pub const ETAG_KEY: &str = "etag";

/// Minimal string key/value store, shaped after the Web Storage API
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove_item(&self, key: &str) -> StoreResult<()>;
    fn clear(&self) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        (**self).remove_item(key)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}

/// In-memory key/value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        self.items.borrow_mut().clear();
        Ok(())
    }
}

/// Outcome of removing an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The entry was cached and has been deleted
    Deleted,
    /// The entry was not cached; a tombstone was appended
    Tombstoned,
}

/// Typed access to the record list
#[derive(Debug)]
pub struct EntryStore<S> {
    backend: S,
}

impl<S: KeyValueStore> EntryStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// The underlying key/value store
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Load all cached records; a missing key is an empty list
    pub fn load(&self) -> StoreResult<Vec<Record>> {
        let Some(raw) = self.backend.get_item(ENTRIES_KEY)? else {
            return Ok(Vec::new());
        };
        let records: Option<Vec<Record>> =
            serde_json::from_str(&raw).map_err(|e| StoreError::Malformed {
                key: ENTRIES_KEY.to_string(),
                error: e.to_string(),
            })?;
        Ok(records.unwrap_or_default())
    }

    /// Replace the cached records
    pub fn save(&self, records: &[Record]) -> StoreResult<()> {
        let raw = serde_json::to_string(records)?;
        self.backend.set_item(ENTRIES_KEY, &raw)
    }

    /// Append a new entry
    pub fn push(&self, entry: Entry) -> StoreResult<()> {
        let mut records = self.load()?;
        tracing::debug!(timestamp = %entry.timestamp, label = entry.label, "Storing entry");
        records.push(Record::Entry(entry));
        self.save(&records)
    }

    /// Remove the entry with the given timestamp.
    ///
    /// A cached record is deleted outright. An entry that only exists in
    /// the exported page gets a tombstone instead, so the removal survives
    /// a reload of that page.
    pub fn remove(&self, timestamp: Timestamp) -> StoreResult<Removal> {
        let mut records = self.load()?;
        let outcome = match records.iter().position(|r| r.timestamp() == timestamp) {
            Some(pos) => {
                records.remove(pos);
                Removal::Deleted
            }
            None => {
                records.push(Record::Remove(Tombstone::remove(timestamp)));
                Removal::Tombstoned
            }
        };
        tracing::debug!(%timestamp, ?outcome, "Removed entry");
        self.save(&records)?;
        Ok(outcome)
    }

    /// Etag of the last synced document
    pub fn etag(&self) -> StoreResult<Option<String>> {
        self.backend.get_item(ETAG_KEY)
    }

    /// Remember the etag of the synced document
    pub fn set_etag(&self, etag: &str) -> StoreResult<()> {
        self.backend.set_item(ETAG_KEY, etag)
    }

    /// Drop everything, etag included
    pub fn clear(&self) -> StoreResult<()> {
        self.backend.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::entry::Amount;

    fn entry(ts: i64) -> Entry {
        Entry::new(Amount::from_cents(150), "€", 1, Timestamp::from_millis(ts))
    }

    #[test]
    fn test_load_missing_or_null_is_empty() {
        let store = EntryStore::new(MemoryStore::new());
        assert!(store.load().unwrap().is_empty());

        store.backend().set_item(ENTRIES_KEY, "null").unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_malformed() {
        let store = EntryStore::new(MemoryStore::new());
        store.backend().set_item(ENTRIES_KEY, "{not json").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Malformed { .. })));
    }

    #[test]
    fn test_push_appends_in_order() {
        let store = EntryStore::new(MemoryStore::new());
        store.push(entry(1_767_225_600_001)).unwrap();
        store.push(entry(1_767_225_600_002)).unwrap();

        let records = store.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].timestamp().millis(), 1_767_225_600_002);
    }

    #[test]
    fn test_remove_cached_entry_deletes_it() {
        let store = EntryStore::new(MemoryStore::new());
        store.push(entry(1_767_225_600_001)).unwrap();
        store.push(entry(1_767_225_600_002)).unwrap();

        let outcome = store.remove(Timestamp::from_millis(1_767_225_600_001)).unwrap();

        assert_eq!(outcome, Removal::Deleted);
        let records = store.load().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records.iter().all(|r| !r.is_tombstone()));
    }

    #[test]
    fn test_remove_uncached_entry_appends_tombstone() {
        let store = EntryStore::new(MemoryStore::new());
        store.push(entry(1_767_225_600_001)).unwrap();

        let outcome = store.remove(Timestamp::from_millis(1_767_225_600_009)).unwrap();

        assert_eq!(outcome, Removal::Tombstoned);
        let records = store.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[1],
            Record::Remove(Tombstone::remove(Timestamp::from_millis(1_767_225_600_009)))
        );
    }

    #[test]
    fn test_etag_and_clear() {
        let store = EntryStore::new(MemoryStore::new());
        store.set_etag("abc").unwrap();
        store.push(entry(1_767_225_600_001)).unwrap();
        assert_eq!(store.etag().unwrap().as_deref(), Some("abc"));

        store.clear().unwrap();
        assert!(store.backend().is_empty());
        assert!(store.etag().unwrap().is_none());
    }

    #[test]
    fn test_boxed_backend() {
        let backend: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        let store = EntryStore::new(backend);
        store.push(entry(1_767_225_600_001)).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_reads_stored_json_written_by_browser() {
        let store = EntryStore::new(MemoryStore::new());
        store
            .backend()
            .set_item(
                ENTRIES_KEY,
                r#"[{"value":"2.00","currency":"€","label":0,"timestamp":1767225600000},
                    {"event":"remove","timestamp":"1767000000000"}]"#,
            )
            .unwrap();
        let records = store.load().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[1].is_tombstone());
    }
}
