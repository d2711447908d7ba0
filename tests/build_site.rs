//! Builds a complete site and runs the compression job against a temporary
//! content directory.

use folio::compress::{self, CompressOptions, FileOutcome};
use folio::config::{self, SiteConfig};
use folio::content::Content;
use folio::generate;
use image::{ImageBuffer, Rgb};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CV: &str = r#"{
    "general": { "displayName": "Ada Example", "about": "Designer in **Lisbon**." },
    "contact": [{ "platform": "Email", "url": "mailto:ada@example.com", "handle": "ada@example.com" }],
    "workExperience": [{ "year": 2020, "heading": "Studio", "url": "https://studio.example" }],
    "projects": [
        { "title": "Atlas", "year": "2021", "description": "Maps of *nowhere*.",
          "attachments": [
              { "type": "image", "url": "/content/media/atlas-1.png" },
              { "type": "image", "url": "/content/media/atlas-2.png" }
          ] },
        { "title": "Unfinished", "year": "2023", "attachments": [] }
    ],
    "sideProjects": [
        { "heading": "Zine", "year": "Ongoing",
          "attachments": [{ "type": "image", "url": "/content/media/zine.png" }] }
    ]
}"#;

fn write_png(path: &Path, size: u32) {
    let img = ImageBuffer::from_fn(size, size, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 3 % 256) as u8, ((x + y) % 256) as u8])
    });
    img.save(path).unwrap();
}

/// `content/` with config, cv.json and three PNGs under the media dir.
fn setup_source(tmp: &TempDir) -> std::path::PathBuf {
    let source = tmp.path().join("content");
    let media = source.join("public/content/media");
    fs::create_dir_all(&media).unwrap();
    fs::write(source.join("cv.json"), CV).unwrap();
    fs::write(
        source.join("config.toml"),
        r#"
[site]
title = "Ada's Work"

[animation]
stagger_ms = 50
"#,
    )
    .unwrap();
    for name in ["atlas-1.png", "atlas-2.png", "zine.png"] {
        write_png(&media.join(name), 48);
    }
    source
}

fn load(source: &Path) -> (SiteConfig, Content) {
    let config = config::load_config(source).unwrap();
    let content = Content::load(&source.join(&config.content_file)).unwrap();
    (config, content)
}

#[test]
fn builds_every_page() {
    let tmp = TempDir::new().unwrap();
    let source = setup_source(&tmp);
    let output = tmp.path().join("dist");
    let (config, content) = load(&source);

    let report = generate::generate(&source, &output, &config, &content).unwrap();

    for page in [
        "index.html",
        "projects/01-zine/index.html",
        "projects/01-zine/fullscreen.html",
        "projects/02-atlas/index.html",
        "projects/02-atlas/fullscreen.html",
        "index/index.html",
        "index/01.html",
        "index/02.html",
        "about/index.html",
    ] {
        assert!(output.join(page).is_file(), "missing {page}");
    }
    assert_eq!(report.pages.len(), 9);
    assert_eq!(report.assets_copied, 3);
    assert!(output.join("content/media/zine.png").is_file());
    assert!(output.join("_headers").is_file());
}

#[test]
fn pages_reflect_config_and_content() {
    let tmp = TempDir::new().unwrap();
    let source = setup_source(&tmp);
    let output = tmp.path().join("dist");
    let (config, content) = load(&source);
    generate::generate(&source, &output, &config, &content).unwrap();

    let index = fs::read_to_string(output.join("index.html")).unwrap();
    assert!(index.contains("<title>Ada's Work</title>"));
    assert!(index.contains("--reveal-delay: 50ms;"));
    assert!(!index.contains("Unfinished"));

    let atlas = fs::read_to_string(output.join("projects/02-atlas/index.html")).unwrap();
    assert!(atlas.contains("<em>nowhere</em>"));
    assert!(atlas.contains("fullscreen.html#media-1"));

    let about = fs::read_to_string(output.join("about/index.html")).unwrap();
    assert!(about.contains("<strong>Lisbon</strong>"));
    assert!(about.contains("2020"));
}

#[test]
fn compress_backs_up_replaces_and_caches() {
    let tmp = TempDir::new().unwrap();
    let source = setup_source(&tmp);
    let config = config::load_config(&source).unwrap();
    let options = CompressOptions::from_config(&source, &config.compress, true);

    let first = compress::compress(&options, None).unwrap();
    assert_eq!(first.total(), 3);
    assert_eq!(first.errors(), 0);
    assert!(
        first
            .files
            .iter()
            .all(|f| matches!(f.outcome, FileOutcome::Compressed { .. }))
    );
    for name in ["atlas-1.png", "atlas-2.png", "zine.png"] {
        assert!(source.join("image-backups").join(name).is_file());
        assert!(!options.media_dir.join(format!("temp-{name}")).exists());
        image::open(options.media_dir.join(name)).unwrap();
    }

    let second = compress::compress(&options, None).unwrap();
    assert_eq!(second.cache.hits, 3);
    assert_eq!(second.cache.misses, 0);
}

#[test]
fn compress_without_cache_recompresses() {
    let tmp = TempDir::new().unwrap();
    let source = setup_source(&tmp);
    let config = config::load_config(&source).unwrap();

    let cached = CompressOptions::from_config(&source, &config.compress, true);
    compress::compress(&cached, None).unwrap();

    let uncached = CompressOptions::from_config(&source, &config.compress, false);
    let report = compress::compress(&uncached, None).unwrap();
    assert_eq!(report.cache.hits, 0);
    assert_eq!(report.cache.misses, 3);
}

#[test]
fn compress_reports_progress_for_each_file() {
    let tmp = TempDir::new().unwrap();
    let source = setup_source(&tmp);
    let config = config::load_config(&source).unwrap();
    let options = CompressOptions::from_config(&source, &config.compress, true);

    let (tx, rx) = std::sync::mpsc::channel();
    compress::compress(&options, Some(tx)).unwrap();
    let mut done: Vec<usize> = rx.iter().map(|e| e.done).collect();
    done.sort();
    assert_eq!(done, [1, 2, 3]);
}
