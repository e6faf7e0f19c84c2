//! App Root Component
//!
//! Provides the ledger state and lays out the page.

use ausgabenzettel::ledger::Entry;
use leptos::*;

use crate::components::{Agenda, DonutChart, EntryForm, EntryList, ExportForm, OverviewSelect};
use crate::state::provide_ledger_state;
use crate::sync;

/// Root application component
#[component]
pub fn App(
    /// Entries found in the page before mounting
    document_entries: Vec<Entry>,
) -> impl IntoView {
    let state = provide_ledger_state(document_entries);
    sync::capture_etag(state);

    view! {
        <main class="ausgabenzettel">
            <header class="menu">
                <OverviewSelect />
                <ExportForm />
            </header>

            <section class="overview">
                <DonutChart />
                <Agenda />
            </section>

            <EntryForm />
            <EntryList />
        </main>
    }
}
