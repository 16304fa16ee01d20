//! Dynamic-grid strategy: a single greedy pass instead of exhaustive
//! partition search. Each row starts at a preferred item count and shrinks
//! while its narrowest tile would undercut the minimum tile width; the last
//! row and a final single leftover tile get special sizing so the tail of
//! the grid does not balloon. O(n) per call by design.

use crate::photo::{Photo, RatioMap};

use super::{fitted_row_height, raw_ratio, sanitize_width, Layout, RatioItem, Row, Tile};

#[derive(Debug, Clone)]
pub struct DynamicGridOptions {
    pub gap: f64,
    pub min_per_row: usize,
    pub max_per_row: usize,
    pub preferred_per_row: usize,
    pub mobile_min_per_row: usize,
    pub mobile_max_per_row: usize,
    pub min_tile_width_mobile: f64,
    pub min_tile_width_desktop: f64,
    pub max_tile_width_mobile: f64,
    pub max_tile_width_desktop: f64,
    pub mobile_break_point: f64,
    pub target_row_height: f64,
    pub min_row_height: f64,
    pub max_row_height: f64,
    pub single_max_height: f64,
    /// Let the last row fill the container instead of matching the average
    /// height of the rows above it
    pub stretch_last_row: bool,
    pub clamp_row_heights: bool,
}

impl Default for DynamicGridOptions {
    fn default() -> Self {
        Self {
            gap: 10.0,
            min_per_row: 3,
            max_per_row: 6,
            preferred_per_row: 4,
            mobile_min_per_row: 1,
            mobile_max_per_row: 2,
            min_tile_width_mobile: 150.0,
            min_tile_width_desktop: 180.0,
            max_tile_width_mobile: 320.0,
            max_tile_width_desktop: 420.0,
            mobile_break_point: 760.0,
            target_row_height: 300.0,
            min_row_height: 210.0,
            max_row_height: 420.0,
            single_max_height: 300.0,
            stretch_last_row: true,
            clamp_row_heights: true,
        }
    }
}

fn narrowest_tile_width(chunk: &[RatioItem], row_height: f64) -> f64 {
    let min_width = chunk
        .iter()
        .map(|item| item.ratio * row_height)
        .fold(f64::INFINITY, f64::min);
    if min_width.is_finite() {
        min_width
    } else {
        0.0
    }
}

/// Greedily lay out `photos` into rows at roughly the preferred item count,
/// trading global optimality for a single pass.
pub fn layout(
    photos: &[Photo],
    container_width: f64,
    ratios: &RatioMap,
    options: &DynamicGridOptions,
) -> Layout {
    let width = sanitize_width(container_width);
    let mobile = width <= options.mobile_break_point;
    let min_tile_width = if mobile {
        options.min_tile_width_mobile
    } else {
        options.min_tile_width_desktop
    };
    let max_tile_width = if mobile {
        options.max_tile_width_mobile
    } else {
        options.max_tile_width_desktop
    };
    let effective_min_per_row = if mobile {
        options.mobile_min_per_row
    } else {
        options.min_per_row
    };
    let effective_max_per_row = if mobile {
        options.mobile_max_per_row
    } else {
        options.max_per_row
    };

    // Derive per-row count bounds from the tile-width band; when they
    // conflict, relax min-per-row to preserve the minimum tile width.
    let max_by_min_tile_width =
        (((width + options.gap) / (min_tile_width + options.gap)).floor() as usize).max(1);
    let min_by_max_tile_width =
        (((width + options.gap) / (max_tile_width + options.gap)).ceil() as usize).max(1);
    let allowed_min_per_row = effective_min_per_row.max(min_by_max_tile_width);
    let clamped_max_per_row = effective_max_per_row.min(max_by_min_tile_width).max(1);
    let clamped_min_per_row = allowed_min_per_row.min(clamped_max_per_row);
    let target_per_row = options
        .preferred_per_row
        .clamp(clamped_min_per_row, clamped_max_per_row);

    let items: Vec<RatioItem> = photos
        .iter()
        .map(|photo| RatioItem {
            photo: photo.id,
            ratio: raw_ratio(ratios, photo.id, 1.0),
        })
        .collect();

    if items.is_empty() {
        return Layout::empty();
    }

    if items.len() == 1 {
        let ratio = items[0].ratio;
        let constrained_width = width.min(max_tile_width);
        let height = options.single_max_height.min(constrained_width / ratio);
        return Layout {
            rows: vec![Row {
                gap: 0.0,
                height,
                tiles: vec![Tile {
                    photo: items[0].photo,
                    width: ratio * height,
                }],
            }],
        };
    }

    let mut rows: Vec<Row> = Vec::new();
    let mut full_row_heights: Vec<f64> = Vec::new();
    let mut laid_out_tile_width_sum = 0.0;
    let mut laid_out_tile_count = 0usize;
    let mut cursor = 0;

    while cursor < items.len() {
        let remaining = items.len() - cursor;
        let max_count_for_row = clamped_max_per_row.min(remaining);
        let mut chosen_count = target_per_row.min(max_count_for_row);

        while chosen_count > 1 {
            let chunk = &items[cursor..cursor + chosen_count];
            let row_height = fitted_row_height(chunk, width, options.gap);
            if narrowest_tile_width(chunk, row_height) >= min_tile_width {
                break;
            }
            chosen_count -= 1;
        }

        let chunk = &items[cursor..cursor + chosen_count];
        let is_single_tile = chosen_count == 1;
        let is_last_row = cursor + chosen_count >= items.len();
        let gap = if is_single_tile { 0.0 } else { options.gap };
        let fitted = fitted_row_height(chunk, width, gap);

        let mut row_height = fitted;
        if is_last_row {
            let average_height = if full_row_heights.is_empty() {
                options.target_row_height
            } else {
                full_row_heights.iter().sum::<f64>() / full_row_heights.len() as f64
            };
            let desired_tail_height = if options.stretch_last_row {
                fitted
            } else {
                fitted.min(average_height)
            };
            row_height = if options.clamp_row_heights {
                options
                    .min_row_height
                    .max(options.max_row_height.min(desired_tail_height))
            } else {
                desired_tail_height
            };

            if is_single_tile {
                // Size a lone leftover tile toward the running average tile
                // width instead of the full fitted width.
                let ratio = chunk[0].ratio;
                let average_tile_width = if laid_out_tile_count > 0 {
                    laid_out_tile_width_sum / laid_out_tile_count as f64
                } else {
                    max_tile_width.min(width)
                };
                let target_tile_width =
                    min_tile_width.max(average_tile_width).min(max_tile_width);
                row_height = width.min(target_tile_width).max(1.0) / ratio;
            }
        } else {
            full_row_heights.push(row_height);
        }

        let tiles: Vec<Tile> = chunk
            .iter()
            .map(|item| Tile {
                photo: item.photo,
                width: item.ratio * row_height,
            })
            .collect();
        for tile in &tiles {
            laid_out_tile_width_sum += tile.width;
            laid_out_tile_count += 1;
        }

        rows.push(Row {
            gap,
            height: row_height,
            tiles,
        });
        cursor += chosen_count;
    }

    Layout { rows }
}
