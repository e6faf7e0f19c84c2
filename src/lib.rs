//! # Ausgabenzettel
//!
//! A single-page personal expense tracker. Amounts are booked under a fixed
//! set of labels, kept in the browser's local storage and summarized as a
//! donut chart and a per-label agenda. The page can sync itself, as a whole
//! HTML document, to a small etag-guarded server.
//!
//! ## Modules
//!
//! - [`ledger`]: label catalog, entries, filtering, aggregation and chart
//!   geometry; builds for the browser as well
//! - [`config`]: sync server configuration (feature `server`)
//! - [`sync`]: the document sync server (feature `server`)
//!
//! ## Quick Start
//!
//! ```rust
//! use ausgabenzettel::ledger::*;
//! use chrono::{NaiveDate, Utc};
//!
//! let ledger = Ledger::new(EntryStore::new(MemoryStore::new()), Vec::new());
//! let day = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
//! let at = Timestamp::from_millis(1_767_268_800_000); // 2026-01-01T12:00Z
//!
//! ledger.add("12.50".parse()?, DEFAULT_CURRENCY, 0, at)?;
//!
//! let summary = ledger.summary(&Filter::new(Period::Daily, day), &Utc)?;
//! assert_eq!(summary.total.to_string(), "12.50");
//! # Ok::<(), LedgerError>(())
//! ```

pub mod ledger;

#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod sync;

// Re-export top-level types for convenience
pub use ledger::{
    Amount, Entry, EntryStore, Filter, KeyValueStore, Label, Ledger, LedgerError, MemoryStore,
    Period, Record, Summary, Timestamp, LABELS,
};

#[cfg(feature = "server")]
pub use config::{Config, ConfigError, LoggingConfig, ServerConfig, TlsConfig};

#[cfg(feature = "server")]
pub use sync::{build_router, serve, AppState, DocumentStore, SyncError};
