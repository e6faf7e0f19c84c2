//! Entry Form
//!
//! Books an amount under a label on the selected day.

use ausgabenzettel::ledger::LABELS;
use leptos::*;

use crate::state::LedgerState;

/// Entry form component
#[component]
pub fn EntryForm() -> impl IntoView {
    let state = expect_context::<LedgerState>();

    let (label, set_label) = create_signal(0usize);
    let (value, set_value) = create_signal(String::new());
    let input_ref = create_node_ref::<html::Input>();

    let focus_input = move || {
        if let Some(input) = input_ref.get_untracked() {
            let _ = input.focus();
        }
    };

    let on_label = move |ev: web_sys::Event| {
        if let Ok(index) = event_target_value(&ev).parse() {
            set_label.set(index);
        }
        focus_input();
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let v = value.get_untracked();
        if !v.trim().is_empty() {
            match state.add_entry(&v, label.get_untracked()) {
                Ok(entry) => {
                    web_sys::console::log_1(
                        &format!("Booked {} under label {}", entry.amount_text(), entry.label).into(),
                    );
                    set_value.set(String::new());
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Failed to book {:?}: {}", v, e).into());
                }
            }
        }
        focus_input();
    };

    view! {
        <form id="daily_form" on:submit=on_submit>
            <select id="daily_label_select" on:change=on_label>
                {LABELS
                    .iter()
                    .map(|l| {
                        view! {
                            <option value=l.index.to_string() selected=move || label.get() == l.index>
                                {l.title}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
            <input
                id="daily_input"
                type="text"
                inputmode="decimal"
                autocomplete="off"
                placeholder="0.00"
                node_ref=input_ref
                prop:value=move || value.get()
                on:input=move |ev| set_value.set(event_target_value(&ev))
            />
            <button type="submit">"Add"</button>
        </form>
    }
}
