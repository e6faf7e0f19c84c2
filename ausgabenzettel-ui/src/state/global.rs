//! Ledger State
//!
//! The page's ledger plus the reactive signals every component renders from.

use std::cell::RefCell;
use std::rc::Rc;

use ausgabenzettel::ledger::{
    aggregate, document, entry_timestamp, Amount, Entry, EntryStore, Filter, KeyValueStore, Ledger,
    MemoryStore, Period, Removal, Summary, Timestamp, DEFAULT_CURRENCY,
};
use chrono::{Local, NaiveDate};
use leptos::*;

use super::storage::LocalStorage;

type Backend = Box<dyn KeyValueStore>;

/// Application state provided to all components
#[derive(Clone)]
pub struct LedgerState {
    ledger: Rc<RefCell<Ledger<Backend>>>,
    /// Selected overview period
    pub period: RwSignal<Period>,
    /// Day the overview is centered on and new entries are booked on
    pub selected_date: RwSignal<NaiveDate>,
    /// Bumped after every change to the records
    revision: RwSignal<u64>,
    /// Aggregate of all records under the current filter
    pub summary: Memo<Summary>,
}

/// Provide the ledger state to the component tree
pub fn provide_ledger_state(document_entries: Vec<Entry>) -> LedgerState {
    let backend: Backend = match LocalStorage::open() {
        Some(storage) => Box::new(storage),
        None => {
            web_sys::console::error_1(&"Local storage unavailable, entries are kept in memory".into());
            Box::new(MemoryStore::new())
        }
    };
    let ledger = Rc::new(RefCell::new(Ledger::new(EntryStore::new(backend), document_entries)));

    let period = create_rw_signal(Period::default());
    let selected_date = create_rw_signal(Local::now().date_naive());
    let revision = create_rw_signal(0u64);

    let summary = {
        let ledger = Rc::clone(&ledger);
        create_memo(move |_| {
            revision.track();
            let filter = Filter::new(period.get(), selected_date.get());
            summarize(&ledger.borrow(), &filter)
        })
    };

    let state = LedgerState {
        ledger,
        period,
        selected_date,
        revision,
        summary,
    };
    provide_context(state.clone());
    state
}

fn summarize(ledger: &Ledger<Backend>, filter: &Filter) -> Summary {
    match ledger.summary(filter, &Local) {
        Ok(summary) => summary,
        Err(e) => {
            web_sys::console::error_1(&format!("Failed to read stored entries: {}", e).into());
            let records = document::merge(ledger.document_entries(), &[]);
            aggregate(&records, filter, &Local)
        }
    }
}

impl LedgerState {
    fn changed(&self) {
        self.revision.update(|r| *r += 1);
    }

    /// Book an amount on the selected day at the current wall-clock time
    pub fn add_entry(&self, value: &str, label: usize) -> Result<Entry, String> {
        let value: Amount = value.parse().map_err(|e| format!("{}", e))?;
        let at = entry_timestamp(self.selected_date.get_untracked(), &Local::now());

        let entry = self
            .ledger
            .borrow()
            .add(value, DEFAULT_CURRENCY, label, at)
            .map_err(|e| e.to_string())?;
        self.changed();
        Ok(entry)
    }

    /// Remove an entry, tombstoning it when it only exists in the page
    pub fn remove_entry(&self, timestamp: Timestamp) -> Result<Removal, String> {
        let removal = self
            .ledger
            .borrow()
            .remove(timestamp)
            .map_err(|e| e.to_string())?;
        self.changed();
        Ok(removal)
    }

    /// Etag of the last synced page
    pub fn etag(&self) -> Option<String> {
        match self.ledger.borrow().store().etag() {
            Ok(etag) => etag,
            Err(e) => {
                web_sys::console::error_1(&format!("Failed to read etag: {}", e).into());
                None
            }
        }
    }

    /// Remember the etag of the synced page
    pub fn set_etag(&self, etag: &str) {
        if let Err(e) = self.ledger.borrow().store().set_etag(etag) {
            web_sys::console::error_1(&format!("Failed to store etag: {}", e).into());
        }
    }

    /// The page now carries every rendered entry; drop the local cache
    pub fn exported(&self) {
        let rendered = self.summary.get_untracked().rendered_entries();
        if let Err(e) = self.ledger.borrow_mut().exported(rendered) {
            web_sys::console::error_1(&format!("Failed to clear local storage: {}", e).into());
        }
        self.changed();
    }
}
