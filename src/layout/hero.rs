//! Hero-pattern strategy: curate a leading subset of the photos into one,
//! two, or three rows that share a single gap. The gap is the free variable,
//! solved algebraically so the rows sum to a target total height; candidates
//! whose row heights leave the allowed band are rejected outright rather
//! than clamped.

use crate::photo::{Photo, RatioMap};

use super::solver::{
    counts_within, even_counts, row_count_range, Candidate, CandidateEvaluator, Selector,
};
use super::{raw_ratio, sanitize_width, Layout, RatioItem, Row, Tile};

/// Options for [`layout`]. `min_count`/`max_count` bound how many leading
/// photos a candidate may use; the search deliberately favours a small
/// curated pick over using every available photo.
#[derive(Debug, Clone)]
pub struct HeroPatternOptions {
    pub target_total_height: f64,
    pub min_gap: f64,
    pub max_gap: f64,
    pub target_gap: f64,
    pub min_row_height: f64,
    pub max_row_height: f64,
    pub min_per_row: usize,
    pub max_per_row: usize,
    pub min_rows: Option<usize>,
    pub max_rows: Option<usize>,
    pub fallback_gap: f64,
    pub fallback_max_tiles: usize,
    pub fallback_min_rows: usize,
    pub min_count: usize,
    pub max_count: usize,
    pub ratio_fallback: f64,
    pub min_ratio: Option<f64>,
    pub max_ratio: Option<f64>,
    pub row_height_uniformity_weight: f64,
    /// Allow swapping immediately-adjacent edge items between neighbouring
    /// rows when it evens out the row load; row counts never change.
    pub rebalance_rows: bool,
}

impl Default for HeroPatternOptions {
    fn default() -> Self {
        Self {
            target_total_height: 280.0,
            min_gap: 2.0,
            max_gap: 20.0,
            target_gap: 8.0,
            min_row_height: 70.0,
            max_row_height: 320.0,
            min_per_row: 2,
            max_per_row: 7,
            min_rows: None,
            max_rows: None,
            fallback_gap: 8.0,
            fallback_max_tiles: 6,
            fallback_min_rows: 1,
            min_count: 4,
            max_count: 18,
            ratio_fallback: 1.0,
            min_ratio: None,
            max_ratio: None,
            row_height_uniformity_weight: 1.0,
            rebalance_rows: false,
        }
    }
}

/// A row under construction: its items and their ratio sum, floored to a
/// small epsilon so it is always a safe divisor.
struct HeroRow {
    items: Vec<RatioItem>,
    ratio_sum: f64,
}

fn floor_sum(value: f64) -> f64 {
    if value == 0.0 {
        0.0001
    } else {
        value
    }
}

fn build_hero_rows(chunk: &[RatioItem], counts: &[usize]) -> Vec<HeroRow> {
    let mut rows = Vec::with_capacity(counts.len());
    let mut cursor = 0;
    for &count in counts {
        let items = chunk[cursor..cursor + count].to_vec();
        cursor += count;
        let ratio_sum = floor_sum(items.iter().map(|item| item.ratio).sum());
        rows.push(HeroRow { items, ratio_sum });
    }
    rows
}

/// Greedy load-balancing pass: swap the trailing item of a row with the
/// leading item of the next row whenever that reduces the spread of per-row
/// ratio load. Row membership counts are untouched; only boundary items move.
fn rebalance(rows: &mut [HeroRow], width: f64, target_gap: f64) {
    let row_width =
        |count: usize| (width - target_gap * count.saturating_sub(1) as f64).max(1.0);
    let spread = |sums: &[f64], rows: &[HeroRow]| -> f64 {
        if rows.is_empty() {
            return 0.0;
        }
        let loads: Vec<f64> = sums
            .iter()
            .zip(rows)
            .map(|(sum, row)| sum / row_width(row.items.len()))
            .collect();
        let mean = loads.iter().sum::<f64>() / loads.len() as f64;
        let variance =
            loads.iter().map(|load| (load - mean).powi(2)).sum::<f64>() / loads.len() as f64;
        variance.sqrt()
    };

    let mut sums: Vec<f64> = rows.iter().map(|row| row.ratio_sum).collect();
    let mut baseline = spread(&sums, rows);
    let mut improved = true;
    let mut iterations = 0;
    let max_iterations = rows.len().saturating_mul(4).max(2);

    while improved && iterations < max_iterations {
        improved = false;
        iterations += 1;

        for index in 0..rows.len().saturating_sub(1) {
            let Some(&left_item) = rows[index].items.last() else {
                continue;
            };
            let Some(&right_item) = rows[index + 1].items.first() else {
                continue;
            };
            let next_left = floor_sum(rows[index].ratio_sum - left_item.ratio + right_item.ratio);
            let next_right =
                floor_sum(rows[index + 1].ratio_sum - right_item.ratio + left_item.ratio);

            let (previous_left, previous_right) = (sums[index], sums[index + 1]);
            sums[index] = next_left;
            sums[index + 1] = next_right;
            let candidate_spread = spread(&sums, rows);
            if candidate_spread + 0.0001 >= baseline {
                sums[index] = previous_left;
                sums[index + 1] = previous_right;
                continue;
            }

            let last = rows[index].items.len() - 1;
            rows[index].items[last] = right_item;
            rows[index + 1].items[0] = left_item;
            rows[index].ratio_sum = next_left;
            rows[index + 1].ratio_sum = next_right;
            baseline = candidate_spread;
            improved = true;
        }
    }
}

struct HeroEvaluator {
    width: f64,
    target_total_height: f64,
    min_gap: f64,
    max_gap: f64,
    target_gap: f64,
    min_row_height: f64,
    max_row_height: f64,
    uniformity_weight: f64,
    rebalance_rows: bool,
}

impl CandidateEvaluator for HeroEvaluator {
    fn evaluate(&self, chunk: &[RatioItem], counts: &[usize]) -> Option<Candidate> {
        let mut rows = build_hero_rows(chunk, counts);
        if self.rebalance_rows {
            rebalance(&mut rows, self.width, self.target_gap);
        }

        // Solve for the shared gap: total height is the sum of per-row
        // heights (width - gap*(count-1)) / ratio_sum, linear in gap.
        let denominator = (rows.len() as f64 - 1.0)
            - rows
                .iter()
                .map(|row| row.items.len().saturating_sub(1) as f64 / row.ratio_sum)
                .sum::<f64>();
        if denominator.abs() < 0.0001 {
            return None;
        }

        let widths_part: f64 = rows.iter().map(|row| self.width / row.ratio_sum).sum();
        let raw_gap = (self.target_total_height - widths_part) / denominator;
        if !raw_gap.is_finite() {
            return None;
        }
        let gap = self.min_gap.max(self.max_gap.min(raw_gap));

        let prepared: Vec<Row> = rows
            .iter()
            .map(|row| {
                let height = (self.width - gap * row.items.len().saturating_sub(1) as f64)
                    / row.ratio_sum;
                Row {
                    gap,
                    height,
                    tiles: row
                        .items
                        .iter()
                        .map(|item| Tile {
                            photo: item.photo,
                            width: item.ratio * height,
                        })
                        .collect(),
                }
            })
            .collect();

        if prepared
            .iter()
            .any(|row| row.height < self.min_row_height || row.height > self.max_row_height)
        {
            return None;
        }

        let mean = prepared.iter().map(|row| row.height).sum::<f64>() / prepared.len() as f64;
        let variance = prepared
            .iter()
            .map(|row| (row.height - mean).powi(2))
            .sum::<f64>()
            / prepared.len() as f64;
        let std_dev = variance.sqrt();
        let clamp_penalty = (raw_gap - gap).abs() * 1.8;
        let score = (gap - self.target_gap).abs() * 2.4
            + std_dev * self.uniformity_weight
            + clamp_penalty
            + chunk.len() as f64 * 0.05;

        Some(Candidate {
            score,
            counts: counts.to_vec(),
            rows: prepared,
        })
    }
}

/// Lay out a curated hero strip from the leading photos. Never fails: when
/// no candidate keeps every row height in band, a capped best-effort layout
/// is returned instead.
pub fn layout(
    photos: &[Photo],
    container_width: f64,
    ratios: &RatioMap,
    options: &HeroPatternOptions,
) -> Layout {
    let width = sanitize_width(container_width);

    let items: Vec<RatioItem> = photos
        .iter()
        .filter_map(|photo| {
            let raw = raw_ratio(ratios, photo.id, options.ratio_fallback);
            let with_min = options.min_ratio.map_or(raw, |min| raw.max(min));
            let ratio = options.max_ratio.map_or(with_min, |max| with_min.min(max));
            (ratio > 0.0).then_some(RatioItem {
                photo: photo.id,
                ratio,
            })
        })
        .collect();

    if items.is_empty() {
        return Layout::empty();
    }

    let max_count = items.len().min(options.max_count).max(1);
    let min_count = options.min_count.min(max_count).max(1);
    let min_rows_option = options.min_rows.map(|rows| rows.max(1));
    let max_rows_option = options.max_rows.map(|rows| rows.max(1));
    let min_per_row = options.min_per_row;
    let max_per_row = options.max_per_row;

    let evaluator = HeroEvaluator {
        width,
        target_total_height: options.target_total_height,
        min_gap: options.min_gap,
        max_gap: options.max_gap,
        target_gap: options.target_gap,
        min_row_height: options.min_row_height,
        max_row_height: options.max_row_height,
        uniformity_weight: options.row_height_uniformity_weight,
        rebalance_rows: options.rebalance_rows,
    };
    let mut selector = Selector::default();

    for count in min_count..=max_count {
        let chunk = &items[..count];

        let (min_rows_by_count, max_rows_by_count) =
            row_count_range(count, min_per_row, max_per_row);
        let min_rows = min_rows_option.unwrap_or(min_rows_by_count).max(min_rows_by_count);
        let max_rows = max_rows_option.unwrap_or(max_rows_by_count).min(max_rows_by_count);
        if min_rows > max_rows {
            continue;
        }

        for rows_count in min_rows..=max_rows {
            let counts = even_counts(count, rows_count);
            if !counts_within(&counts, min_per_row, max_per_row) {
                continue;
            }
            if let Some(candidate) = evaluator.evaluate(chunk, &counts) {
                selector.offer(candidate);
            }
        }

        // Explicit two-row splits, beyond the canonical even partition.
        if let Some(first_upper) = count.checked_sub(min_per_row) {
            for first in min_per_row..=first_upper {
                let second = count - first;
                if first > max_per_row || second > max_per_row {
                    continue;
                }
                if let Some(candidate) = evaluator.evaluate(chunk, &[first, second]) {
                    selector.offer(candidate);
                }
            }
        }

        // Explicit three-row splits.
        if let Some(first_upper) = count.checked_sub(min_per_row * 2) {
            for first in min_per_row..=first_upper {
                let Some(second_upper) = (count - first).checked_sub(min_per_row) else {
                    continue;
                };
                for second in min_per_row..=second_upper {
                    let third = count - first - second;
                    if first > max_per_row
                        || second > max_per_row
                        || third > max_per_row
                        || third < min_per_row
                    {
                        continue;
                    }
                    if let Some(candidate) = evaluator.evaluate(chunk, &[first, second, third]) {
                        selector.offer(candidate);
                    }
                }
            }
        }
    }

    if let Some(best) = selector.into_best() {
        return Layout { rows: best.rows };
    }

    tracing::warn!(
        items = items.len(),
        width,
        "no hero candidate kept row heights in band, using capped fallback"
    );
    fallback_layout(&items, width, options)
}

/// Best-effort layout when the search rejects everything: a capped subset
/// split as evenly as the per-row maximum allows, heights bounded above.
fn fallback_layout(items: &[RatioItem], width: f64, options: &HeroPatternOptions) -> Layout {
    let fallback = &items[..items.len().min(options.fallback_max_tiles)];
    if fallback.is_empty() {
        return Layout::empty();
    }

    let rows_count = fallback.len().min(
        options
            .fallback_min_rows
            .max(fallback.len().div_ceil(options.max_per_row.max(1))),
    );
    let counts = even_counts(fallback.len(), rows_count.max(1));

    let mut rows = Vec::with_capacity(counts.len());
    let mut cursor = 0;
    for count in counts {
        if count == 0 {
            continue;
        }
        let chunk = &fallback[cursor..cursor + count];
        cursor += count;

        let ratio_sum = floor_sum(chunk.iter().map(|item| item.ratio).sum());
        let fitted = (width - options.fallback_gap * (count - 1) as f64) / ratio_sum;
        let height = options.max_row_height.min(fitted.max(1.0));
        rows.push(Row {
            gap: options.fallback_gap,
            height,
            tiles: chunk
                .iter()
                .map(|item| Tile {
                    photo: item.photo,
                    width: item.ratio * height,
                })
                .collect(),
        });
    }

    Layout { rows }
}
