//! Aspect-ratio resolution for photo sources.
//!
//! Resolution is deliberately infallible: a missing, unreadable, or
//! degenerate image resolves to ratio 1.0 so a batch can never stall or
//! lose a photo, and the layout engine can be re-invoked safely once more
//! ratios arrive.

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::photo::{Photo, PhotoId, RatioMap};

/// Resolve the width/height ratio of one image source (a local path to a
/// downloaded or cached file). Returns `1.0` for empty input or any probe
/// failure; never errors.
pub fn resolve_image_aspect_ratio(src: &str) -> f64 {
    let src = src.trim();
    if src.is_empty() {
        return 1.0;
    }

    match probe_dimensions(src) {
        Ok(ratio) => ratio,
        Err(error) => {
            tracing::debug!(src, %error, "aspect ratio probe failed, defaulting to 1");
            1.0
        }
    }
}

/// Header-only dimension read; decoding the pixel data is never needed.
fn probe_dimensions(src: &str) -> Result<f64> {
    let (width, height) =
        image::image_dimensions(src).with_context(|| format!("failed to probe {src}"))?;
    if width == 0 || height == 0 {
        anyhow::bail!("image reports zero dimensions ({width}x{height})");
    }
    Ok(width as f64 / height as f64)
}

/// Whether `ratios` already holds a usable ratio for this photo.
pub fn has_resolved_ratio(ratios: &RatioMap, photo: PhotoId) -> bool {
    ratios
        .get(&photo)
        .is_some_and(|ratio| ratio.is_finite() && *ratio > 0.0)
}

/// Resolve ratios for every photo lacking a finite positive entry in
/// `current`, probing all of them in parallel and gathering the results.
/// Returns only the newly resolved entries, keyed by photo id and ready to
/// merge into the caller's ratio store. Completion order is irrelevant.
pub fn resolve_missing_aspect_ratios<F>(photos: &[Photo], current: &RatioMap, src_for: F) -> RatioMap
where
    F: Fn(&Photo) -> &str + Sync,
{
    let resolved: RatioMap = photos
        .par_iter()
        .filter(|photo| !has_resolved_ratio(current, photo.id))
        .map(|photo| (photo.id, resolve_image_aspect_ratio(src_for(photo))))
        .collect();

    if !resolved.is_empty() {
        tracing::debug!(
            resolved = resolved.len(),
            total = photos.len(),
            "resolved missing aspect ratios"
        );
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_test_png(name: &str, width: u32, height: u32) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        image::RgbaImage::new(width, height)
            .save(&path)
            .expect("writing test png");
        path
    }

    #[test]
    fn empty_source_resolves_to_one() {
        assert_eq!(resolve_image_aspect_ratio(""), 1.0);
        assert_eq!(resolve_image_aspect_ratio("   "), 1.0);
    }

    #[test]
    fn unreadable_source_resolves_to_one() {
        assert_eq!(resolve_image_aspect_ratio("/no/such/photo.jpg"), 1.0);
    }

    #[test]
    fn real_image_resolves_to_its_true_ratio() {
        let path = write_test_png("photogrid-ratio-4x2.png", 4, 2);
        let ratio = resolve_image_aspect_ratio(path.to_str().unwrap());
        assert!((ratio - 2.0).abs() < 1e-9);
    }

    #[test]
    fn batch_resolves_only_missing_entries() {
        let png = write_test_png("photogrid-ratio-3x3.png", 3, 3);
        let photos = vec![
            Photo::new(1, png.to_str().unwrap(), ""),
            Photo::new(2, "/no/such/photo.jpg", ""),
            Photo::new(3, "", ""),
        ];
        let mut current = RatioMap::new();
        current.insert(2, 1.5);

        let resolved = resolve_missing_aspect_ratios(&photos, &current, |photo| photo.src.as_str());

        assert_eq!(resolved.len(), 2);
        assert!((resolved[&1] - 1.0).abs() < 1e-9);
        assert_eq!(resolved[&3], 1.0);
        assert!(!resolved.contains_key(&2), "already-resolved ids stay untouched");
    }

    #[test]
    fn junk_entries_count_as_missing() {
        let mut current = RatioMap::new();
        current.insert(1, f64::NAN);
        current.insert(2, 0.0);
        current.insert(3, -1.2);
        current.insert(4, 1.33);
        assert!(!has_resolved_ratio(&current, 1));
        assert!(!has_resolved_ratio(&current, 2));
        assert!(!has_resolved_ratio(&current, 3));
        assert!(has_resolved_ratio(&current, 4));
        assert!(!has_resolved_ratio(&current, 99));
    }
}
