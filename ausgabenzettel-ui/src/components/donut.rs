//! Donut Chart Component
//!
//! SVG ring of the per-label totals, sized to match the agenda next to it.

use ausgabenzettel::ledger::donut::{self, DEFAULT_WEIGHT};
use ausgabenzettel::ledger::LABELS;
use leptos::*;

use crate::state::page::root_font_size;
use crate::state::LedgerState;

/// Donut chart component
#[component]
pub fn DonutChart() -> impl IntoView {
    let state = expect_context::<LedgerState>();
    let summary = state.summary;

    // Measured once; the agenda always lists every label
    let size = donut::agenda_size_em(LABELS.len()) * root_font_size();
    let chart = create_memo(move |_| {
        donut::donut(&donut::slices(&summary.get()), size, DEFAULT_WEIGHT)
    });
    let px = format!("{}px", size);

    view! {
        <div id="daily_donut">
            <svg class="donut" height=px.clone() width=px>
                {move || {
                    chart
                        .get()
                        .arcs
                        .into_iter()
                        .map(|arc| {
                            view! {
                                <path
                                    class="donut-arc"
                                    d=arc.d
                                    stroke=arc.stroke
                                    stroke-width=arc.stroke_width
                                    fill="none"
                                    data-name=arc.name
                                />
                            }
                        })
                        .collect_view()
                }}
            </svg>
        </div>
    }
}
