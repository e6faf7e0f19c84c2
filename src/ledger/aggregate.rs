//! Aggregation
//!
//! Folds the merged record list into what one render pass needs: per-label
//! totals for the agenda and donut, a grand total, and the entry rows in
//! display order (newest first).

use chrono::TimeZone;
use std::collections::HashSet;

use super::catalog::{self, Label, LABELS};
use super::entry::{Amount, Entry, Record, Timestamp};
use super::filter::Filter;

/// Total spent under one label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelTotal {
    pub label: &'static Label,
    pub value: Amount,
}

/// One entry row of the entry list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub entry: Entry,
    /// Whether the entry passes the filter; hidden rows are still rendered
    pub shown: bool,
}

impl Row {
    /// Catalog label of this row
    pub fn label(&self) -> Option<&'static Label> {
        catalog::label(self.entry.label)
    }
}

/// Result of one aggregation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// One total per catalog label, in catalog order
    pub totals: Vec<LabelTotal>,
    /// Sum of all shown entries
    pub total: Amount,
    /// Entry rows, newest first, tombstoned entries excluded
    pub rows: Vec<Row>,
}

impl Summary {
    /// Totals sorted by value, largest first; ties keep catalog order
    pub fn agenda(&self) -> Vec<LabelTotal> {
        let mut sorted = self.totals.clone();
        sorted.sort_by(|a, b| b.value.cmp(&a.value));
        sorted
    }

    /// Total for a single label index
    pub fn total_for(&self, index: usize) -> Amount {
        self.totals
            .get(index)
            .map(|t| t.value)
            .unwrap_or(Amount::ZERO)
    }

    /// Number of shown rows
    pub fn shown_count(&self) -> usize {
        self.rows.iter().filter(|r| r.shown).count()
    }

    /// Entries that survive into an exported page (every rendered row)
    pub fn rendered_entries(&self) -> Vec<Entry> {
        self.rows.iter().map(|r| r.entry.clone()).collect()
    }
}

/// Fold records into totals and rows for the given filter
pub fn aggregate<Tz: TimeZone>(records: &[Record], filter: &Filter, tz: &Tz) -> Summary {
    let removed: HashSet<Timestamp> = records
        .iter()
        .filter(|r| r.is_tombstone())
        .map(Record::timestamp)
        .collect();

    let mut totals: Vec<LabelTotal> = LABELS
        .iter()
        .map(|label| LabelTotal {
            label,
            value: Amount::ZERO,
        })
        .collect();
    let mut total = Amount::ZERO;
    let mut rows = Vec::new();

    for entry in records.iter().rev().filter_map(Record::as_entry) {
        if removed.contains(&entry.timestamp) {
            continue;
        }
        let Some(slot) = totals.get_mut(entry.label) else {
            tracing::warn!(
                label = entry.label,
                timestamp = %entry.timestamp,
                "Skipping entry with unknown label"
            );
            continue;
        };

        let shown = filter.show(entry, tz);
        if shown {
            slot.value += entry.value;
            total += entry.value;
        }
        rows.push(Row {
            entry: entry.clone(),
            shown,
        });
    }

    tracing::debug!(
        rows = rows.len(),
        tombstones = removed.len(),
        total = %total,
        period = %filter.period,
        "Aggregated entries"
    );

    Summary {
        totals,
        total,
        rows,
    }
}
