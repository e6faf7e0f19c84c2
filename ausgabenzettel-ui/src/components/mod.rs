//! UI Components
//!
//! Leptos components for the expense page. Each renders the element ids the
//! page markup has always used, so exported pages keep their shape.

pub mod agenda;
pub mod donut;
pub mod entry_form;
pub mod entry_list;
pub mod export;
pub mod overview;

pub use agenda::Agenda;
pub use donut::DonutChart;
pub use entry_form::EntryForm;
pub use entry_list::EntryList;
pub use export::ExportForm;
pub use overview::OverviewSelect;
