//! Hero photo pool: flatten the preview photos of the visible series into a
//! deduplicated, shuffled pool for the home-page hero strip.

use std::collections::HashSet;

use compact_str::{format_compact, CompactString};
use rand::seq::SliceRandom;

use crate::photo::{Photo, PhotoId, SeriesPreview};

/// Upper bound on the hero pool; more photos than this adds churn without
/// visible variety.
pub const HERO_MAX_POOL: usize = 36;

/// Collect every usable preview photo across `series`, in encounter order.
/// Photos without a source are skipped; duplicates (same id and source) are
/// kept once. Alt text falls back from the photo name to the series title
/// to a synthetic label.
pub fn collect_hero_photos(series: &[SeriesPreview]) -> Vec<Photo> {
    let mut seen: HashSet<(PhotoId, CompactString)> = HashSet::new();
    let mut photos = Vec::new();

    for item in series {
        for preview in &item.preview_photos {
            let src = preview.public_url.trim();
            if src.is_empty() {
                continue;
            }
            if !seen.insert((preview.id, CompactString::new(src))) {
                continue;
            }

            let alt = if !preview.original_name.is_empty() {
                preview.original_name.clone()
            } else if !item.title.is_empty() {
                item.title.clone()
            } else {
                format_compact!("photo-{}", preview.id)
            };
            photos.push(Photo {
                id: preview.id,
                src: CompactString::new(src),
                alt,
            });
        }
    }

    photos
}

/// Fisher-Yates shuffle, in place.
pub fn shuffle_photos(photos: &mut [Photo]) {
    photos.shuffle(&mut rand::rng());
}

/// Collect, shuffle, and cap the hero pool in one step.
pub fn build_hero_pool(series: &[SeriesPreview]) -> Vec<Photo> {
    let mut photos = collect_hero_photos(series);
    shuffle_photos(&mut photos);
    photos.truncate(HERO_MAX_POOL);
    photos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::PreviewPhoto;

    fn preview(id: PhotoId, url: &str, name: &str) -> PreviewPhoto {
        PreviewPhoto {
            id,
            public_url: CompactString::new(url),
            original_name: CompactString::new(name),
        }
    }

    fn series(id: u64, title: &str, previews: Vec<PreviewPhoto>) -> SeriesPreview {
        SeriesPreview {
            id,
            title: CompactString::new(title),
            preview_photos: previews,
        }
    }

    #[test]
    fn skips_sourceless_photos_and_dedupes_by_id_and_src() {
        let input = [
            series(
                1,
                "City",
                vec![
                    preview(10, "/p/10.jpg", "dawn.jpg"),
                    preview(11, "", "lost.jpg"),
                    preview(10, "/p/10.jpg", "dawn.jpg"),
                ],
            ),
            series(2, "Coast", vec![preview(10, "/p/10-alt.jpg", "")]),
        ];
        let photos = collect_hero_photos(&input);

        let ids_and_srcs: Vec<(u64, &str)> = photos
            .iter()
            .map(|photo| (photo.id, photo.src.as_str()))
            .collect();
        assert_eq!(
            ids_and_srcs,
            vec![(10, "/p/10.jpg"), (10, "/p/10-alt.jpg")],
            "same id with a different source is a different pool entry"
        );
    }

    #[test]
    fn alt_text_falls_back_from_name_to_title_to_label() {
        let input = [
            series(1, "City", vec![preview(10, "/a.jpg", "dawn.jpg")]),
            series(2, "Coast", vec![preview(11, "/b.jpg", "")]),
            series(3, "", vec![preview(12, "/c.jpg", "")]),
        ];
        let photos = collect_hero_photos(&input);
        assert_eq!(photos[0].alt, "dawn.jpg");
        assert_eq!(photos[1].alt, "Coast");
        assert_eq!(photos[2].alt, "photo-12");
    }

    #[test]
    fn shuffle_preserves_the_photo_multiset() {
        let input = [series(
            1,
            "City",
            (1..=20)
                .map(|id| preview(id, &format!("/p/{id}.jpg"), ""))
                .collect(),
        )];
        let mut photos = collect_hero_photos(&input);
        let mut before: Vec<u64> = photos.iter().map(|photo| photo.id).collect();
        shuffle_photos(&mut photos);
        let mut after: Vec<u64> = photos.iter().map(|photo| photo.id).collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    #[test]
    fn pool_is_capped_at_the_maximum() {
        let input = [series(
            1,
            "City",
            (1..=60)
                .map(|id| preview(id, &format!("/p/{id}.jpg"), ""))
                .collect(),
        )];
        let pool = build_hero_pool(&input);
        assert_eq!(pool.len(), HERO_MAX_POOL);
    }
}
