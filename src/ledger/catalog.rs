//! Label catalog
//!
//! The fixed set of spending categories. Labels are addressed by index;
//! the index is what entries store and what the `catN` CSS classes encode.

use serde::Serialize;

/// A spending category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Label {
    /// Position in the catalog, stored on every entry
    pub index: usize,
    /// Display title
    pub title: &'static str,
    /// Longer description shown when the agenda row is expanded
    pub description: &'static str,
    /// Chart and agenda color as `#rrggbb`
    pub color: &'static str,
}

/// All labels, in catalog order
pub const LABELS: [Label; 6] = [
    Label {
        index: 0,
        title: "Groceries",
        description: "Food & drinks for home",
        color: "#5f90b0",
    },
    Label {
        index: 1,
        title: "Dining Out",
        description: "Restaurants, cafés, bars, takeout, delivery",
        color: "#6068af",
    },
    Label {
        index: 2,
        title: "Housing",
        description: "Rent, utilities, maintenance, repairs",
        color: "#60afa6",
    },
    Label {
        index: 3,
        title: "Transportation",
        description: "Public transit, fuel, car costs, bike, parking, rideshare",
        color: "#7f62ad",
    },
    Label {
        index: 4,
        title: "Necessities",
        description: "Essential non-food items like cleaning supplies, toiletries, basic clothing",
        color: "#62ad7f",
    },
    Label {
        index: 5,
        title: "Entertainment",
        description: "Electronics, gadgets, entertainment, hobbies, subscriptions, leisure activities",
        color: "#a463ac",
    },
];

const CLASS_PREFIX: &str = "cat";

/// Look up a label by index
pub fn label(index: usize) -> Option<&'static Label> {
    LABELS.get(index)
}

impl Label {
    /// CSS class for this label (`cat1` for index 0)
    pub fn css_class(&self) -> String {
        css_class(self.index)
    }

    /// Text color that stays readable on top of [`Label::color`]
    pub fn text_color(&self) -> &'static str {
        readable_text_color(self.color)
    }
}

/// CSS class for a label index
pub fn css_class(index: usize) -> String {
    format!("{}{}", CLASS_PREFIX, index + 1)
}

/// Parse a `catN` class back into a label index
pub fn class_index(class: &str) -> Option<usize> {
    let n: usize = class.strip_prefix(CLASS_PREFIX)?.parse().ok()?;
    n.checked_sub(1)
}

/// Pick black or white text for a `#rrggbb` background.
///
/// Uses the WCAG relative luminance; anything brighter than 0.179 gets
/// black text. Unparseable colors are treated as black backgrounds.
pub fn readable_text_color(hex: &str) -> &'static str {
    let hex = hex.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| -> f64 {
        let value = hex
            .get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0);
        let c = f64::from(value) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };

    let luminance = 0.2126 * channel(0..2) + 0.7152 * channel(2..4) + 0.0722 * channel(4..6);

    if luminance > 0.179 {
        "#000000"
    } else {
        "#ffffff"
    }
}
