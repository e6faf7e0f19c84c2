//! Ledger session
//!
//! Ties the entry store to the entries baked into the current page and
//! exposes the operations the page performs: add, remove, summarize and
//! hand over to an export.

use chrono::{DateTime, NaiveDate, TimeZone};

use super::aggregate::{aggregate, Summary};
use super::catalog;
use super::document;
use super::entry::{Amount, Entry, Record, Timestamp};
use super::error::{LedgerError, LedgerResult};
use super::filter::Filter;
use super::store::{EntryStore, KeyValueStore, Removal};

/// The page's view of all entries
#[derive(Debug)]
pub struct Ledger<S> {
    store: EntryStore<S>,
    document: Vec<Entry>,
}

impl<S: KeyValueStore> Ledger<S> {
    /// Create a ledger over a store and the entries found in the page
    pub fn new(store: EntryStore<S>, document: Vec<Entry>) -> Self {
        Self { store, document }
    }

    /// The entry store
    pub fn store(&self) -> &EntryStore<S> {
        &self.store
    }

    /// Entries baked into the page
    pub fn document_entries(&self) -> &[Entry] {
        &self.document
    }

    /// Document entries merged with the cached records
    pub fn records(&self) -> LedgerResult<Vec<Record>> {
        let cached = self.store.load()?;
        Ok(document::merge(&self.document, &cached))
    }

    /// Aggregate everything for one render pass
    pub fn summary<Tz: TimeZone>(&self, filter: &Filter, tz: &Tz) -> LedgerResult<Summary> {
        Ok(aggregate(&self.records()?, filter, tz))
    }

    /// Record a new expense.
    ///
    /// The timestamp is bumped by a millisecond while it collides with an
    /// existing record, since timestamps identify entries.
    pub fn add(
        &self,
        value: Amount,
        currency: &str,
        label: usize,
        at: Timestamp,
    ) -> LedgerResult<Entry> {
        if catalog::label(label).is_none() {
            return Err(LedgerError::UnknownLabel(label as i64));
        }

        let records = self.records()?;
        let mut millis = at.millis();
        while records.iter().any(|r| r.timestamp().millis() == millis) {
            millis += 1;
        }

        let entry = Entry::new(value, currency, label, Timestamp::from_millis(millis));
        self.store.push(entry.clone())?;
        tracing::info!(timestamp = %entry.timestamp, label, value = %value, "Added entry");
        Ok(entry)
    }

    /// Remove an entry by timestamp
    pub fn remove(&self, timestamp: Timestamp) -> LedgerResult<Removal> {
        Ok(self.store.remove(timestamp)?)
    }

    /// After an export the page itself carries every rendered entry; the
    /// cache is cleared and the rendered entries become document entries.
    pub fn exported(&mut self, rendered: Vec<Entry>) -> LedgerResult<()> {
        self.store.clear()?;
        tracing::info!(entries = rendered.len(), "Cleared cache after export");
        self.document = rendered;
        Ok(())
    }
}

/// Timestamp for an entry booked on `date` at the wall-clock time of `now`
pub fn entry_timestamp<Tz: TimeZone>(date: NaiveDate, now: &DateTime<Tz>) -> Timestamp {
    let local = date.and_time(now.time());
    let millis = now
        .timezone()
        .from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| now.timestamp_millis());
    Timestamp::from_millis(millis)
}
