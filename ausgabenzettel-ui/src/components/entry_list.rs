//! Entry List
//!
//! Every entry, newest first. Entries outside the selected period stay in
//! the markup but hidden, so an exported page carries all of them.

use ausgabenzettel::ledger::{catalog, Row, Timestamp};
use leptos::*;

use crate::state::LedgerState;

/// Entry list component
#[component]
pub fn EntryList() -> impl IntoView {
    let state = expect_context::<LedgerState>();
    let summary = state.summary;

    view! {
        <div id="details">
            {move || {
                summary
                    .get()
                    .rows
                    .into_iter()
                    .map(|row| view! { <EntryRow row=row /> })
                    .collect_view()
            }}
        </div>
    }
}

/// Class list of a rendered entry
fn row_class(row: &Row) -> String {
    let class = catalog::css_class(row.entry.label);
    if row.shown {
        class
    } else {
        format!("{} hidden", class)
    }
}

#[component]
fn EntryRow(row: Row) -> impl IntoView {
    let state = expect_context::<LedgerState>();
    let timestamp: Timestamp = row.entry.timestamp;
    let title = row.label().map(|l| l.title).unwrap_or_default();

    let on_remove = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        if let Err(e) = state.remove_entry(timestamp) {
            web_sys::console::error_1(&format!("Failed to remove {}: {}", timestamp, e).into());
        }
    };

    view! {
        <details id=timestamp.to_string() class=row_class(&row)>
            <summary>
                <span>{title}</span>
                <span>{row.entry.amount_text()}</span>
            </summary>
            <a href="#" on:click=on_remove>"remove"</a>
        </details>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ausgabenzettel::ledger::{Amount, Entry};

    fn row(label: usize, shown: bool) -> Row {
        Row {
            entry: Entry::new(Amount::from_cents(100), "€", label, Timestamp::from_millis(1)),
            shown,
        }
    }

    #[test]
    fn test_row_class() {
        assert_eq!(row_class(&row(0, true)), "cat1");
        assert_eq!(row_class(&row(5, false)), "cat6 hidden");
    }
}
