//! Ledger core
//!
//! Everything the expense page computes, independent of the browser:
//!
//! - [`catalog`]: the fixed spending labels
//! - [`entry`]: amounts, timestamps, entries and tombstones
//! - [`week`]: ISO week numbers
//! - [`filter`]: the daily/weekly/monthly/yearly/all predicate
//! - [`aggregate`]: per-label totals and entry rows
//! - [`document`]: entries recovered from an exported page
//! - [`store`]: the `dailyEntries` record list over a key/value store
//! - [`donut`]: SVG arc geometry for the chart
//! - [`session`]: the operations the page performs

pub mod aggregate;
pub mod catalog;
pub mod document;
pub mod donut;
pub mod entry;
pub mod error;
pub mod filter;
pub mod session;
pub mod store;
pub mod week;

pub use aggregate::{aggregate, LabelTotal, Row, Summary};
pub use catalog::{Label, LABELS};
pub use donut::{donut, Donut, Slice};
pub use entry::{Amount, Entry, Record, Timestamp, Tombstone, DEFAULT_CURRENCY};
pub use error::{LedgerError, LedgerResult, StoreError, StoreResult};
pub use filter::{Filter, Period};
pub use session::{entry_timestamp, Ledger};
pub use store::{EntryStore, KeyValueStore, MemoryStore, Removal};
pub use week::{iso_week, week_number, IsoWeek};
