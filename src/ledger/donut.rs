//! Donut chart geometry
//!
//! Computes one SVG arc path per weighted slice. Rendering is left to the
//! caller; the UI places the paths in an `<svg>` of `size` by `size` pixels.

use std::f64::consts::PI;

use super::aggregate::Summary;

/// Default chart size in pixels
pub const DEFAULT_SIZE: f64 = 100.0;
/// Default ring thickness in pixels
pub const DEFAULT_WEIGHT: f64 = 50.0;

/// Largest fraction of the circle one arc may cover; a full circle would
/// start and end on the same point and draw nothing
const FULL_CIRCLE_CLAMP: f64 = 0.9999;

/// One weighted slice
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub value: f64,
    pub color: String,
    pub name: String,
}

impl Slice {
    pub fn new(value: f64, color: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            value,
            color: color.into(),
            name: name.into(),
        }
    }
}

/// One arc of the ring
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    /// SVG path data
    pub d: String,
    /// Stroke color
    pub stroke: String,
    /// Stroke width (the ring weight)
    pub stroke_width: f64,
    /// Slice name, rendered as `data-name`
    pub name: String,
}

/// A computed donut chart
#[derive(Debug, Clone, PartialEq)]
pub struct Donut {
    pub size: f64,
    pub arcs: Vec<Arc>,
}

/// Round for path output and drop negative zero
fn coord(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}

/// Compute the arcs for a set of slices
pub fn donut(slices: &[Slice], size: f64, weight: f64) -> Donut {
    // Only positive slices are drawn, so only they share the circle
    let sum: f64 = slices.iter().map(|s| s.value).filter(|v| *v > 0.0).sum();
    let r = size / 2.0;
    let arc_radius = r - weight / 2.0;
    let mut start_angle = -PI / 2.0;
    let mut arcs = Vec::new();

    if sum <= 0.0 || !sum.is_finite() {
        return Donut { size, arcs };
    }

    for slice in slices {
        if slice.value <= 0.0 {
            continue;
        }
        let mut fraction = slice.value / sum;
        if fraction >= 1.0 {
            fraction = FULL_CIRCLE_CLAMP;
        }

        let segment = fraction * PI * 2.0;
        let end_angle = start_angle + segment;
        let large_arc = if segment > PI { 1 } else { 0 };
        let (start_x, start_y) = (
            r + start_angle.cos() * arc_radius,
            r + start_angle.sin() * arc_radius,
        );
        let (end_x, end_y) = (
            r + end_angle.cos() * arc_radius,
            r + end_angle.sin() * arc_radius,
        );
        start_angle = end_angle;

        let d = format!(
            "M {} {} A {} {} 0 {} 1 {} {}",
            coord(start_x),
            coord(start_y),
            coord(arc_radius),
            coord(arc_radius),
            large_arc,
            coord(end_x),
            coord(end_y),
        );

        arcs.push(Arc {
            d,
            stroke: slice.color.clone(),
            stroke_width: weight,
            name: slice.name.clone(),
        });
    }

    Donut { size, arcs }
}

/// Slices for a summary, in agenda order
pub fn slices(summary: &Summary) -> Vec<Slice> {
    summary
        .agenda()
        .iter()
        .map(|t| Slice::new(t.value.as_f64(), t.label.color, t.label.title))
        .collect()
}

/// Chart size in `em`, matching the height of an agenda with `rows` rows
/// (each row is 1em tall with 0.25em padding on both sides and 0.5em margin)
pub fn agenda_size_em(rows: usize) -> f64 {
    let n = rows as f64;
    n + n * 0.25 * 2.0 + n * 0.5
}
