//! Overview Selection
//!
//! Period select and the day picker the overview is centered on.

use ausgabenzettel::ledger::Period;
use chrono::{Local, NaiveDate};
use leptos::*;

use crate::state::LedgerState;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Period and day selection
#[component]
pub fn OverviewSelect() -> impl IntoView {
    let state = expect_context::<LedgerState>();
    let period = state.period;
    let selected_date = state.selected_date;

    let on_period = move |ev: web_sys::Event| {
        period.set(Period::from_select(&event_target_value(&ev)));
    };

    // An emptied date input falls back to today
    let on_date = move |ev: web_sys::Event| {
        selected_date.set(parse_date(&event_target_value(&ev)));
    };

    view! {
        <div class="overview-select">
            <select id="menu_overview_select" on:change=on_period>
                {Period::all()
                    .iter()
                    .map(|p| {
                        let p = *p;
                        view! {
                            <option value=p.as_str() selected=move || period.get() == p>
                                {p.caption()}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
            <input
                type="date"
                id="daily_date"
                prop:value=move || selected_date.get().format(DATE_FORMAT).to_string()
                on:change=on_date
            />
        </div>
    }
}

fn parse_date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, DATE_FORMAT).unwrap_or_else(|_| Local::now().date_naive())
}
