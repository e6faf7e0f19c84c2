//! Agenda Component
//!
//! Per-label totals, largest first, followed by the grand total.

use ausgabenzettel::ledger::{Amount, LabelTotal, DEFAULT_CURRENCY};
use leptos::*;

use crate::state::LedgerState;

/// Label agenda component
#[component]
pub fn Agenda() -> impl IntoView {
    let state = expect_context::<LedgerState>();
    let summary = state.summary;

    view! {
        <div id="label_agenda">
            {move || {
                let summary = summary.get();
                summary
                    .agenda()
                    .into_iter()
                    .map(|total| view! { <AgendaRow total=total /> })
                    .collect_view()
            }}
            <details>
                <summary>
                    <span>"Total"</span>
                    <span>{move || money(summary.get().total)}</span>
                </summary>
            </details>
        </div>
    }
}

fn money(value: Amount) -> String {
    format!("{}{}", value, DEFAULT_CURRENCY)
}

/// Background and text colors of a row
fn row_style(total: &LabelTotal) -> String {
    format!("--bg: {}; --fg: {}", total.label.color, total.label.text_color())
}

#[component]
fn AgendaRow(total: LabelTotal) -> impl IntoView {
    view! {
        <details class=total.label.css_class() style=row_style(&total)>
            <summary>
                <span>{total.label.title}</span>
                <span>{money(total.value)}</span>
            </summary>
            <p>{total.label.description}</p>
        </details>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ausgabenzettel::ledger::LABELS;

    #[test]
    fn test_money() {
        assert_eq!(money(Amount::from_cents(1250)), "12.50€");
        assert_eq!(money(Amount::ZERO), "0.00€");
    }

    #[test]
    fn test_row_style() {
        let total = LabelTotal {
            label: &LABELS[0],
            value: Amount::ZERO,
        };
        assert_eq!(
            row_style(&total),
            format!("--bg: #5f90b0; --fg: {}", LABELS[0].text_color())
        );
    }
}
