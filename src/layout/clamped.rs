//! Clamped-height strategy: enumerate even partitions, fit each row, clamp
//! row heights to a band, and keep the candidate with the lowest combined
//! empty-space / target-deviation / out-of-band score.

use crate::photo::{Photo, RatioMap};

use super::solver::{search_even_partitions, Candidate, CandidateEvaluator, Selector};
use super::{fitted_row_height, raw_ratio, sanitize_width, Layout, RatioItem, Row, Tile};

/// Options for [`layout`]. Mobile variants default to the desktop value when
/// unset; `force_mobile_layout` overrides the width breakpoint entirely.
#[derive(Debug, Clone)]
pub struct ClampedHeightOptions {
    pub gap: f64,
    pub min_per_row: usize,
    pub max_per_row: usize,
    pub mobile_min_per_row: Option<usize>,
    pub mobile_max_per_row: Option<usize>,
    pub mobile_break_point: f64,
    /// Use raw (unclamped) ratios on mobile layouts
    pub strict_ratio_on_mobile: bool,
    pub force_mobile_layout: Option<bool>,
    pub target_row_height: f64,
    pub min_row_height: f64,
    pub max_row_height: f64,
    pub min_preview_ratio: f64,
    pub max_preview_ratio: f64,
    pub single_min_height: f64,
    pub single_max_height: f64,
    /// Height of the best-effort single row when no partition is valid
    pub fallback_height: f64,
    pub min_tile_width_desktop: f64,
    pub min_tile_width_mobile: f64,
}

impl Default for ClampedHeightOptions {
    fn default() -> Self {
        Self {
            gap: 8.0,
            min_per_row: 2,
            max_per_row: 5,
            mobile_min_per_row: None,
            mobile_max_per_row: None,
            mobile_break_point: 760.0,
            strict_ratio_on_mobile: false,
            force_mobile_layout: None,
            target_row_height: 170.0,
            min_row_height: 96.0,
            max_row_height: 260.0,
            min_preview_ratio: 0.72,
            max_preview_ratio: 2.4,
            single_min_height: 120.0,
            single_max_height: 240.0,
            fallback_height: 160.0,
            min_tile_width_desktop: 180.0,
            min_tile_width_mobile: 150.0,
        }
    }
}

struct ClampedEvaluator {
    width: f64,
    gap: f64,
    target_row_height: f64,
    min_row_height: f64,
    max_row_height: f64,
    min_tile_width: f64,
}

impl CandidateEvaluator for ClampedEvaluator {
    fn evaluate(&self, items: &[RatioItem], counts: &[usize]) -> Option<Candidate> {
        let mut rows = Vec::with_capacity(counts.len());
        let mut empty_space = 0.0;
        let mut target_deviation = 0.0;
        let mut out_of_range_penalty = 0.0;

        let mut cursor = 0;
        for &count in counts {
            let chunk = &items[cursor..cursor + count];
            cursor += count;

            let fitted = fitted_row_height(chunk, self.width, self.gap);
            let height = self.min_row_height.max(self.max_row_height.min(fitted));
            let tiles: Vec<Tile> = chunk
                .iter()
                .map(|item| Tile {
                    photo: item.photo,
                    width: item.ratio * height,
                })
                .collect();

            let used: f64 = tiles.iter().map(|tile| tile.width).sum::<f64>()
                + self.gap * (count - 1) as f64;
            empty_space += (self.width - used).abs();
            target_deviation += (self.target_row_height - height).abs();

            if fitted != height {
                out_of_range_penalty += (fitted - height).abs() * 6.0;
            }

            let narrowest = tiles
                .iter()
                .map(|tile| tile.width)
                .fold(f64::INFINITY, f64::min);
            if narrowest < self.min_tile_width {
                out_of_range_penalty += (self.min_tile_width - narrowest) * 1200.0;
            }

            rows.push(Row {
                gap: self.gap,
                height,
                tiles,
            });
        }

        let score = empty_space + target_deviation * 1.4 + out_of_range_penalty;
        Some(Candidate {
            score,
            counts: counts.to_vec(),
            rows,
        })
    }
}

/// Partition `photos` into rows that fill `container_width`, keeping row
/// heights inside the configured band. Never fails: degenerate inputs yield
/// an empty layout or the best-effort fallback row.
pub fn layout(
    photos: &[Photo],
    container_width: f64,
    ratios: &RatioMap,
    options: &ClampedHeightOptions,
) -> Layout {
    let width = sanitize_width(container_width);
    let mobile = options
        .force_mobile_layout
        .unwrap_or(width <= options.mobile_break_point);
    let min_per_row = if mobile {
        options.mobile_min_per_row.unwrap_or(options.min_per_row)
    } else {
        options.min_per_row
    };
    let max_per_row = if mobile {
        options.mobile_max_per_row.unwrap_or(options.max_per_row)
    } else {
        options.max_per_row
    };
    let min_tile_width = if mobile {
        options.min_tile_width_mobile
    } else {
        options.min_tile_width_desktop
    };

    let items: Vec<RatioItem> = photos
        .iter()
        .map(|photo| {
            let raw = raw_ratio(ratios, photo.id, 1.0);
            let ratio = if options.strict_ratio_on_mobile && mobile {
                if raw > 0.0 {
                    raw
                } else {
                    1.0
                }
            } else {
                options
                    .min_preview_ratio
                    .max(options.max_preview_ratio.min(raw))
            };
            RatioItem {
                photo: photo.id,
                ratio,
            }
        })
        .collect();

    if items.is_empty() {
        return Layout::empty();
    }

    if items.len() == 1 {
        let ratio = items[0].ratio;
        let height = options
            .single_min_height
            .max(options.single_max_height.min(width / ratio));
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

    let evaluator = ClampedEvaluator {
        width,
        gap: options.gap,
        target_row_height: options.target_row_height,
        min_row_height: options.min_row_height,
        max_row_height: options.max_row_height,
        min_tile_width,
    };
    let mut selector = Selector::default();
    search_even_partitions(&items, min_per_row, max_per_row, &evaluator, &mut selector);

    match selector.into_best() {
        Some(best) => Layout { rows: best.rows },
        None => {
            tracing::warn!(
                items = items.len(),
                width,
                min_per_row,
                max_per_row,
                "no valid partition, using single-row fallback"
            );
            Layout {
                rows: vec![Row {
                    gap: options.gap,
                    height: options.fallback_height,
                    tiles: items
                        .iter()
                        .map(|item| Tile {
                            photo: item.photo,
                            width: item.ratio * options.fallback_height,
                        })
                        .collect(),
                }],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photos(count: usize) -> Vec<Photo> {
        (1..=count as u64)
            .map(|id| Photo::new(id, &format!("/photos/{id}.jpg"), ""))
            .collect()
    }

    fn uniform_ratios(photos: &[Photo], ratio: f64) -> RatioMap {
        photos.iter().map(|photo| (photo.id, ratio)).collect()
    }

    fn tile_ids(layout: &Layout) -> Vec<u64> {
        layout
            .rows
            .iter()
            .flat_map(|row| row.tiles.iter().map(|tile| tile.photo))
            .collect()
    }

    #[test]
    fn empty_photo_list_yields_no_rows() {
        let layout = layout(&[], 1000.0, &RatioMap::new(), &ClampedHeightOptions::default());
        assert!(layout.rows.is_empty());
    }

    #[test]
    fn single_wide_photo_gets_one_clamped_row() {
        let photos = photos(1);
        let ratios = uniform_ratios(&photos, 2.0);
        let result = layout(&photos, 1000.0, &ratios, &ClampedHeightOptions::default());

        assert_eq!(result.rows.len(), 1);
        let row = &result.rows[0];
        assert_eq!(row.gap, 0.0);
        assert_eq!(row.tiles.len(), 1);
        // width / ratio = 500, clamped to single_max_height.
        assert_eq!(row.height, 240.0);
        assert!((row.tiles[0].width - 2.0 * row.height).abs() < 1e-9);
    }

    #[test]
    fn five_square_photos_pick_the_single_fitted_row() {
        let photos = photos(5);
        let ratios = uniform_ratios(&photos, 1.0);
        let result = layout(&photos, 1000.0, &ratios, &ClampedHeightOptions::default());

        // The one-row-of-five candidate fits exactly (height 193.6, zero
        // empty space, deviation 23.6 * 1.4 = 33.04) and beats every
        // clamped two-row split by a wide margin.
        assert_eq!(result.rows.len(), 1);
        let row = &result.rows[0];
        assert_eq!(row.tiles.len(), 5);
        assert!((row.height - 193.6).abs() < 1e-9);

        let used: f64 =
            row.tiles.iter().map(|tile| tile.width).sum::<f64>() + row.gap * 4.0;
        assert!((used - 1000.0).abs() < 0.01);
    }

    #[test]
    fn fitted_rows_fill_the_container_exactly() {
        let photos = photos(6);
        let mut ratios = RatioMap::new();
        for (index, photo) in photos.iter().enumerate() {
            ratios.insert(photo.id, 0.8 + 0.25 * index as f64);
        }
        let options = ClampedHeightOptions::default();
        let result = layout(&photos, 1200.0, &ratios, &options);

        for row in &result.rows {
            if row.height > options.min_row_height && row.height < options.max_row_height {
                let used: f64 = row.tiles.iter().map(|tile| tile.width).sum::<f64>()
                    + row.gap * (row.tiles.len() - 1) as f64;
                assert!((used - 1200.0).abs() < 0.01, "unclamped row must fill width");
            }
            assert!(row.height >= options.min_row_height);
            assert!(row.height <= options.max_row_height);
        }
    }

    #[test]
    fn preserves_photo_order_and_is_idempotent() {
        let photos = photos(7);
        let mut ratios = RatioMap::new();
        for (index, photo) in photos.iter().enumerate() {
            ratios.insert(photo.id, [1.5, 0.75, 1.0, 2.0, 0.9, 1.33, 1.1][index]);
        }
        let first = layout(&photos, 980.0, &ratios, &ClampedHeightOptions::default());
        let second = layout(&photos, 980.0, &ratios, &ClampedHeightOptions::default());

        assert_eq!(tile_ids(&first), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(first, second);
    }

    #[test]
    fn narrow_width_switches_to_mobile_row_bounds() {
        let photos = photos(4);
        let ratios = uniform_ratios(&photos, 1.0);
        let options = ClampedHeightOptions {
            mobile_min_per_row: Some(1),
            mobile_max_per_row: Some(2),
            ..ClampedHeightOptions::default()
        };
        let result = layout(&photos, 360.0, &ratios, &options);

        assert!(!result.rows.is_empty());
        for row in &result.rows {
            assert!(row.tiles.len() <= 2, "mobile bound must cap rows at 2 tiles");
        }
        assert_eq!(result.tile_count(), 4);
    }

    #[test]
    fn unsatisfiable_bounds_fall_back_to_a_single_row() {
        let photos = photos(4);
        let ratios = uniform_ratios(&photos, 1.0);
        let options = ClampedHeightOptions {
            min_per_row: 3,
            max_per_row: 3,
            ..ClampedHeightOptions::default()
        };
        // 4 items cannot be split into rows of exactly 3.
        let result = layout(&photos, 1000.0, &ratios, &options);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].tiles.len(), 4);
        assert_eq!(result.rows[0].height, options.fallback_height);
    }

    #[test]
    fn malformed_ratios_and_width_never_panic() {
        let photos = photos(3);
        let mut ratios = RatioMap::new();
        ratios.insert(1, f64::NAN);
        ratios.insert(2, 0.0);
        // photo 3 missing entirely
        let result = layout(&photos, f64::NAN, &ratios, &ClampedHeightOptions::default());
        assert_eq!(result.tile_count(), 3);
    }
}
