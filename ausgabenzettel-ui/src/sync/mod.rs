//! Page Sync
//!
//! The page is exported as a whole: either downloaded as a file or uploaded
//! to the server it was loaded from. An upload carries the etag captured on
//! load so the server can refuse to overwrite a newer page.

pub mod client;

use leptos::spawn_local;
use wasm_bindgen::{JsCast, JsValue};

use crate::state::LedgerState;

/// File name of a downloaded page
pub const EXPORT_FILE_NAME: &str = "ausgabenzettel.html";

/// Where an export goes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportTarget {
    #[default]
    File,
    Server,
}

impl ExportTarget {
    pub fn all() -> [ExportTarget; 2] {
        [ExportTarget::File, ExportTarget::Server]
    }

    /// Value of the `<option>`
    pub fn as_str(self) -> &'static str {
        match self {
            ExportTarget::File => "file",
            ExportTarget::Server => "server",
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            ExportTarget::File => "File",
            ExportTarget::Server => "Server",
        }
    }

    pub fn from_select(value: &str) -> Self {
        match value {
            "server" => ExportTarget::Server,
            _ => ExportTarget::File,
        }
    }
}

fn is_file_url(href: &str) -> bool {
    href.starts_with("file://")
}

/// Whether the page was opened from disk rather than served
pub fn opened_from_file() -> bool {
    web_sys::window()
        .and_then(|window| window.location().href().ok())
        .is_some_and(|href| is_file_url(&href))
}

/// Markup of the whole page as it is rendered right now
pub fn page_html() -> Option<String> {
    let root = web_sys::window()?.document()?.document_element()?;
    Some(format!("<!doctype html>{}", root.outer_html()))
}

/// Capture the etag of the served page
pub fn capture_etag(state: LedgerState) {
    if opened_from_file() {
        return;
    }

    spawn_local(async move {
        match client::fetch_etag().await {
            Ok(Some(etag)) => state.set_etag(&etag),
            Ok(None) => web_sys::console::log_1(&"Server sent no etag".into()),
            Err(e) => web_sys::console::error_1(&format!("Failed to fetch etag: {}", e).into()),
        }
    });
}

/// Export the page to the chosen target
pub fn export(state: LedgerState, target: ExportTarget) {
    match target {
        ExportTarget::File => export_to_file(&state),
        ExportTarget::Server => export_to_server(state),
    }
}

fn export_to_file(state: &LedgerState) {
    let Some(html) = page_html() else {
        return;
    };
    if let Err(e) = download(&html, EXPORT_FILE_NAME) {
        web_sys::console::error_1(&format!("Download failed: {:?}", e).into());
    }
    state.exported();
}

fn export_to_server(state: LedgerState) {
    if opened_from_file() {
        return;
    }
    let Some(html) = page_html() else {
        return;
    };
    let etag = state.etag();

    spawn_local(async move {
        match client::upload_page(html, etag).await {
            Ok(upload) => {
                if upload.accepted() {
                    state.exported();
                } else {
                    web_sys::console::error_1(
                        &format!("Server refused the page: {}", upload.status).into(),
                    );
                }
                if let Some(etag) = upload.etag.as_deref() {
                    state.set_etag(etag);
                }
            }
            Err(e) => web_sys::console::error_1(&format!("Upload failed: {}", e).into()),
        }
    });
}

/// Offer `content` as a download through a temporary object URL
fn download(content: &str, file_name: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let options = web_sys::BlobPropertyBag::new();
    options.set_type("text/html");
    let blob = web_sys::Blob::new_with_str_sequence_and_options(
        &js_sys::Array::of1(&JsValue::from_str(content)),
        &options,
    )?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let a = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()?;
    a.set_href(&url);
    a.set_download(file_name);
    a.click();

    web_sys::Url::revoke_object_url(&url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_target_select_values() {
        for target in ExportTarget::all() {
            assert_eq!(ExportTarget::from_select(target.as_str()), target);
        }
        assert_eq!(ExportTarget::from_select(""), ExportTarget::File);
    }

    #[test]
    fn test_file_url_detection() {
        assert!(is_file_url("file:///home/me/ausgabenzettel.html"));
        assert!(!is_file_url("https://example.org/"));
    }
}
