//! Ausgabenzettel Page
//!
//! Client-side rendered (CSR) Leptos application compiled to WebAssembly.
//!
//! # Lifecycle
//!
//! - Entries baked into a previously exported page are read back from the
//!   rendered entry list before anything is mounted
//! - The app mounts into `#app`, replacing the exported markup
//! - The etag of the served page is fetched once, unless opened from disk
//! - Exporting writes the whole page, either as a download or back to the
//!   sync server

use leptos::*;

mod app;
mod components;
mod state;
mod sync;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    let document_entries = state::page::read_document_entries();
    web_sys::console::log_1(&format!("Found {} entries in page", document_entries.len()).into());

    match state::page::prepare_mount_point() {
        Some(root) => mount_to(root, move || view! { <app::App document_entries=document_entries /> }),
        None => mount_to_body(move || view! { <app::App document_entries=document_entries /> }),
    }
}
