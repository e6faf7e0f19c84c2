//! Page Helpers
//!
//! Reading entries back out of an exported page and preparing the element
//! the app mounts into.

use ausgabenzettel::ledger::{document, Entry};
use wasm_bindgen::JsCast;

/// Id of the element the app mounts into
pub const APP_ROOT_ID: &str = "app";
/// Id of the rendered entry list
pub const ENTRY_LIST_ID: &str = "details";

const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Entries rendered into the entry list of an exported page.
///
/// Must run before mounting, which replaces the exported markup.
pub fn read_document_entries() -> Vec<Entry> {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return Vec::new();
    };
    let Some(list) = document.get_element_by_id(ENTRY_LIST_ID) else {
        return Vec::new();
    };

    let children = list.children();
    let mut entries = Vec::with_capacity(children.length() as usize);
    for i in 0..children.length() {
        let Some(node) = children.item(i) else {
            continue;
        };
        match read_entry_node(&node) {
            Ok(entry) => entries.push(entry),
            Err(e) => web_sys::console::error_1(
                &format!("Skipping rendered entry {:?}: {}", node.id(), e).into(),
            ),
        }
    }
    entries
}

/// `<details id="{timestamp}" class="catN"><summary><span/><span>{amount}</span></summary>`
fn read_entry_node(node: &web_sys::Element) -> Result<Entry, String> {
    let class_list = node.class_list();
    let classes: Vec<String> = (0..class_list.length())
        .filter_map(|i| class_list.item(i))
        .collect();

    let amount_text = node
        .query_selector("summary > span:nth-child(2)")
        .ok()
        .flatten()
        .and_then(|span| span.text_content())
        .ok_or_else(|| "missing amount".to_string())?;

    document::parse_rendered_entry(&node.id(), classes.iter().map(String::as_str), &amount_text)
        .map_err(|e| e.to_string())
}

/// Empty the exported markup out of `#app`, creating the element if the
/// page has none
pub fn prepare_mount_point() -> Option<web_sys::HtmlElement> {
    let document = web_sys::window()?.document()?;
    let root = match document.get_element_by_id(APP_ROOT_ID) {
        Some(root) => root,
        None => {
            let root = document.create_element("div").ok()?;
            root.set_id(APP_ROOT_ID);
            document.body()?.append_child(&root).ok()?;
            root
        }
    };
    root.set_inner_html("");
    root.dyn_into::<web_sys::HtmlElement>().ok()
}

/// Computed font size of the root element, in pixels
pub fn root_font_size() -> f64 {
    web_sys::window()
        .and_then(|window| {
            let root = window.document()?.document_element()?;
            window.get_computed_style(&root).ok().flatten()
        })
        .and_then(|style| style.get_property_value("font-size").ok())
        .and_then(|size| parse_px(&size))
        .unwrap_or(DEFAULT_FONT_SIZE)
}

fn parse_px(value: &str) -> Option<f64> {
    value.trim().trim_end_matches("px").trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_px() {
        assert_eq!(parse_px("16px"), Some(16.0));
        assert_eq!(parse_px(" 12.5px "), Some(12.5));
        assert_eq!(parse_px("medium"), None);
    }
}
