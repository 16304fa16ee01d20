pub mod clamped;
pub mod dynamic;
pub mod hero;
pub(crate) mod solver;

use crate::photo::{PhotoId, RatioMap};

/// A photo paired with its sanitised aspect ratio, the unit every strategy
/// partitions into rows. Always `ratio > 0` by the time a strategy uses it
/// as a divisor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioItem {
    pub photo: PhotoId,
    pub ratio: f64,
}

/// The rendered box for one photo within a row.
/// `width = ratio * row.height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub photo: PhotoId,
    pub width: f64,
}

/// A horizontal strip of tiles rendered at a single shared height.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub gap: f64,
    pub height: f64,
    pub tiles: Vec<Tile>,
}

/// The full layout result handed to a renderer. Immutable output of a single
/// strategy call; nothing else outlives the invocation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    pub rows: Vec<Row>,
}

impl Layout {
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// Total number of tiles across all rows.
    pub fn tile_count(&self) -> usize {
        self.rows.iter().map(|row| row.tiles.len()).sum()
    }
}

/// Sanitise a container width: non-finite or non-positive widths become 1.0,
/// anything else floors at 1.0. Every strategy accepts arbitrary junk here.
pub(crate) fn sanitize_width(container_width: f64) -> f64 {
    if container_width.is_finite() {
        container_width.max(1.0)
    } else {
        1.0
    }
}

/// Look up a raw ratio for a photo, defaulting missing, non-finite, or zero
/// entries to `fallback`. Negative entries pass through; callers clamp or
/// reject them per strategy policy.
pub(crate) fn raw_ratio(ratios: &RatioMap, photo: PhotoId, fallback: f64) -> f64 {
    match ratios.get(&photo) {
        Some(&value) if value.is_finite() && value != 0.0 => value,
        _ => fallback,
    }
}

/// Sum of item ratios, with an exact zero floored to a small positive
/// epsilon so degenerate chunks never divide by zero.
pub(crate) fn ratio_sum_floored(items: &[RatioItem]) -> f64 {
    let sum: f64 = items.iter().map(|item| item.ratio).sum();
    if sum == 0.0 {
        0.0001
    } else {
        sum
    }
}

/// The row height that makes tile widths plus gaps exactly fill `width`.
pub(crate) fn fitted_row_height(items: &[RatioItem], width: f64, gap: f64) -> f64 {
    let row_width = width - gap * (items.len().saturating_sub(1)) as f64;
    row_width / ratio_sum_floored(items)
}
