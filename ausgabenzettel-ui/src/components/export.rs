//! Export Form
//!
//! Saves the page with every entry baked in, to a file or to the server.

use leptos::*;

use crate::state::LedgerState;
use crate::sync::{self, ExportTarget};

/// Export form component
#[component]
pub fn ExportForm() -> impl IntoView {
    let state = expect_context::<LedgerState>();
    let (target, set_target) = create_signal(ExportTarget::default());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        sync::export(state.clone(), target.get_untracked());
    };

    view! {
        <form id="menu_export" on:submit=on_submit>
            <select
                id="menu_export_select"
                on:change=move |ev| set_target.set(ExportTarget::from_select(&event_target_value(&ev)))
            >
                {ExportTarget::all()
                    .into_iter()
                    .map(|t| {
                        view! {
                            <option value=t.as_str() selected=move || target.get() == t>
                                {t.caption()}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
            <button type="submit">"Export"</button>
        </form>
    }
}
