//! State Management
//!
//! The ledger state shared through context, its local storage backend and
//! helpers for the exported page.

pub mod global;
pub mod page;
pub mod storage;

pub use global::{provide_ledger_state, LedgerState};
