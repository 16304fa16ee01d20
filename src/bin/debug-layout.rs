/// Diagnostic tool to verify the ratio-resolution → layout pipeline
use photogrid_rs::layout::{clamped, dynamic, hero, Layout};
use photogrid_rs::photo::{Photo, RatioMap};
use photogrid_rs::ratio;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("photogrid_rs=debug".parse().unwrap()),
        )
        .init();

    let image_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let container_width: f64 = std::env::args()
        .nth(2)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1200.0);

    println!("=== DIAGNOSTIC: Ratio → Layout Pipeline ===");
    println!("Image directory: {}", image_dir.display());
    println!("Container width: {container_width}");

    // Collect image files
    let mut paths: Vec<PathBuf> = std::fs::read_dir(&image_dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| {
                    matches!(
                        ext.to_ascii_lowercase().as_str(),
                        "jpg" | "jpeg" | "png" | "gif" | "webp"
                    )
                })
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    let photos: Vec<Photo> = paths
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            Photo::new(index as u64 + 1, &path.to_string_lossy(), &name)
        })
        .collect();
    println!("\n[1] Found {} images", photos.len());

    // Resolve aspect ratios (gathered-parallel)
    let ratios = ratio::resolve_missing_aspect_ratios(&photos, &RatioMap::new(), |photo| {
        photo.src.as_str()
    });
    println!("\n[2] Resolved {} aspect ratios:", ratios.len());
    for photo in photos.iter().take(10) {
        println!(
            "    [{}] {} - ratio {:.3}",
            photo.id,
            photo.alt,
            ratios.get(&photo.id).copied().unwrap_or(1.0)
        );
    }

    // Run all three strategies
    let layouts = [
        (
            "clamped-height",
            clamped::layout(
                &photos,
                container_width,
                &ratios,
                &clamped::ClampedHeightOptions::default(),
            ),
        ),
        (
            "hero-pattern",
            hero::layout(
                &photos,
                container_width,
                &ratios,
                &hero::HeroPatternOptions::default(),
            ),
        ),
        (
            "dynamic-grid",
            dynamic::layout(
                &photos,
                container_width,
                &ratios,
                &dynamic::DynamicGridOptions::default(),
            ),
        ),
    ];

    for (step, (name, layout)) in layouts.iter().enumerate() {
        println!(
            "\n[{}] {} layout: {} rows, {} tiles",
            step + 3,
            name,
            layout.rows.len(),
            layout.tile_count()
        );
        print_rows(layout, container_width);
    }

    Ok(())
}

fn print_rows(layout: &Layout, container_width: f64) {
    for (index, row) in layout.rows.iter().enumerate() {
        let used: f64 = row.tiles.iter().map(|tile| tile.width).sum::<f64>()
            + row.gap * (row.tiles.len().saturating_sub(1)) as f64;
        println!(
            "    row [{}]: {} tiles, height {:7.1}, gap {:4.1}, used {:7.1} ({:5.1}% of width)",
            index,
            row.tiles.len(),
            row.height,
            row.gap,
            used,
            used / container_width.max(1.0) * 100.0
        );
    }
}
