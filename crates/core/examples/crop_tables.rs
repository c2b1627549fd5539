use std::path::{Path, PathBuf};

use tabcrop::layout::PrecomputedDetections;
use tabcrop::page::{RasterPage, Word};
use tabcrop::{DetectorConfig, Padding, RenderOptions, TableDetector};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let [page_image, words, detections, out_dir, rest @ ..] = args.as_slice() else {
        eprintln!(
            "Usage: cargo run -p tabcrop --example crop_tables -- \
             <page.png> <words.json> <detections.json> <out-dir> [detector.json]"
        );
        std::process::exit(2);
    };

    let config = DetectorConfig::load(rest.first().map(PathBuf::as_path)).unwrap_or_else(|e| {
        eprintln!("Failed to load detector config: {e}");
        std::process::exit(1);
    });

    let bitmap = image::open(page_image).unwrap_or_else(|e| {
        eprintln!("Failed to open {}: {e}", page_image.display());
        std::process::exit(1);
    });
    let words: Vec<Word> = serde_json::from_str(&read(words)).unwrap_or_else(|e| {
        eprintln!("Failed to parse words from {}: {e}", words.display());
        std::process::exit(1);
    });
    let page = RasterPage::new(page_image.display().to_string(), 0, bitmap, 72)
        .unwrap_or_else(|e| {
            eprintln!("Failed to build page: {e}");
            std::process::exit(1);
        })
        .with_words(words);

    let model = PrecomputedDetections::load(detections).unwrap_or_else(|e| {
        eprintln!("Failed to load detections: {e}");
        std::process::exit(1);
    });
    let detector = TableDetector::new(model, config).unwrap_or_else(|e| {
        eprintln!("Invalid detector config: {e}");
        std::process::exit(1);
    });

    let tables = detector.detect(&page).unwrap_or_else(|e| {
        eprintln!("Table detection failed: {e}");
        std::process::exit(1);
    });

    if let Err(e) = std::fs::create_dir_all(out_dir) {
        eprintln!("Failed to create {}: {e}", out_dir.display());
        std::process::exit(1);
    }

    let options = RenderOptions::at_dpi(144).with_padding(Padding::Auto);
    for (idx, table) in tables.iter().enumerate() {
        let crop_path = out_dir.join(format!("table-{idx}.png"));
        match table.image(&options) {
            Ok(image) => {
                if let Err(e) = image.save(&crop_path) {
                    eprintln!("Failed to write {}: {e}", crop_path.display());
                }
            }
            Err(e) => eprintln!("Failed to render table {idx}: {e}"),
        }

        println!("=== Table {idx} ===");
        match table.to_record().to_json() {
            Ok(record) => println!("{record}"),
            Err(e) => eprintln!("Failed to encode record: {e}"),
        }
        println!("{}", table.text());
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {e}", path.display());
        std::process::exit(1);
    })
}
