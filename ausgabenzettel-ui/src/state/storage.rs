//! Browser Local Storage
//!
//! [`KeyValueStore`] over `window.localStorage`.

use ausgabenzettel::ledger::{KeyValueStore, StoreError, StoreResult};
use wasm_bindgen::JsValue;

/// The window's local storage
#[derive(Clone)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Local storage of the current window, if the browser grants it
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

fn backend_error(e: JsValue) -> StoreError {
    StoreError::Backend(format!("{:?}", e))
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        self.storage.get_item(key).map_err(backend_error)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.storage.set_item(key, value).map_err(backend_error)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.storage.remove_item(key).map_err(backend_error)
    }

    fn clear(&self) -> StoreResult<()> {
        self.storage.clear().map_err(backend_error)
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use ausgabenzettel::ledger::{Amount, Entry, EntryStore, Timestamp};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_entries_round_trip_through_local_storage() {
        let storage = LocalStorage::open().unwrap();
        storage.clear().unwrap();
        let store = EntryStore::new(storage.clone());

        let entry = Entry::new(Amount::from_cents(1250), "€", 2, Timestamp::from_millis(1_767_225_600_000));
        store.push(entry.clone()).unwrap();

        let raw = storage.get_item("dailyEntries").unwrap().unwrap();
        assert!(raw.contains("\"12.50\""));
        assert_eq!(store.load().unwrap()[0].as_entry(), Some(&entry));

        store.clear().unwrap();
        assert!(storage.get_item("dailyEntries").unwrap().is_none());
    }
}
