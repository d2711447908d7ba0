//! Batch PNG recompression.
//!
//! Rewrites every PNG directly under the media directory with a stronger zlib
//! level and adaptive row filtering, so the site ships smaller images without
//! a separate export step.
//!
//! ## Per-file steps
//!
//! ```text
//! public/content/media/cover.png
//!   1. copy → image-backups/cover.png          (only if no backup exists yet)
//!   2. encode → public/content/media/temp-cover.png
//!   3. rename temp-cover.png → cover.png
//! ```
//!
//! A failure at any step removes the temp file, counts as an error, and the
//! batch moves on. Files that the cache recognizes as the output of an
//! earlier run are skipped (see [`crate::cache`]).
//!
//! ## Parallel Processing
//!
//! Files are recompressed on the global rayon pool; the report lists them in
//! file-name order regardless of completion order. Progress events are sent
//! as files finish.

use crate::cache::{self, CacheManifest, CacheStats};
use crate::config::CompressConfig;
use crate::imaging::{BackendError, CompressionLevel, ImageBackend, RecompressParams, RustBackend};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Prefix of the intermediate file written next to the original.
const TEMP_PREFIX: &str = "temp-";

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("media directory not found: {0}")]
    MediaDirNotFound(PathBuf),
}

/// Resolved job settings.
#[derive(Debug, Clone)]
pub struct CompressOptions {
    pub media_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub level: CompressionLevel,
    pub adaptive_filter: bool,
    pub use_cache: bool,
}

impl CompressOptions {
    /// Resolve config paths against the content root.
    pub fn from_config(root: &Path, config: &CompressConfig, use_cache: bool) -> Self {
        Self {
            media_dir: root.join(&config.media_dir),
            backup_dir: root.join(&config.backup_dir),
            level: config.level,
            adaptive_filter: config.adaptive_filter,
            use_cache,
        }
    }
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Compressed { original: u64, compressed: u64 },
    /// Already the product of an earlier run; left untouched.
    Cached { size: u64 },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub name: String,
    pub outcome: FileOutcome,
}

/// Sent once per file as it finishes.
#[derive(Debug, Clone)]
pub struct CompressEvent {
    /// 1-based completion count.
    pub done: usize,
    pub total: usize,
    pub file: FileReport,
}

#[derive(Debug, Clone)]
pub struct CompressReport {
    pub files: Vec<FileReport>,
    pub backup_dir: PathBuf,
    pub cache: CacheStats,
}

impl CompressReport {
    pub fn total(&self) -> usize {
        self.files.len()
    }

    /// Files compressed or already compressed.
    pub fn processed(&self) -> usize {
        self.total() - self.errors()
    }

    pub fn errors(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Failed { .. }))
            .count()
    }

    pub fn original_total(&self) -> u64 {
        self.files
            .iter()
            .map(|f| match f.outcome {
                FileOutcome::Compressed { original, .. } => original,
                FileOutcome::Cached { size } => size,
                FileOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn compressed_total(&self) -> u64 {
        self.files
            .iter()
            .map(|f| match f.outcome {
                FileOutcome::Compressed { compressed, .. } => compressed,
                FileOutcome::Cached { size } => size,
                FileOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    /// Bytes saved; negative when the re-encode grew the files.
    pub fn saved(&self) -> i64 {
        self.original_total() as i64 - self.compressed_total() as i64
    }

    /// Average reduction in percent, or `None` when nothing was measured.
    pub fn average_reduction(&self) -> Option<f64> {
        reduction_percent(self.original_total(), self.compressed_total())
    }
}

/// `(1 - compressed / original) * 100`.
pub fn reduction_percent(original: u64, compressed: u64) -> Option<f64> {
    if original == 0 {
        None
    } else {
        Some((1.0 - compressed as f64 / original as f64) * 100.0)
    }
}

/// PNG files (case-insensitive extension) directly under `dir`, sorted by name.
///
/// Leftover `temp-*` files from an interrupted run are skipped.
pub fn list_pngs(dir: &Path) -> Result<Vec<String>, CompressError> {
    if !dir.is_dir() {
        return Err(CompressError::MediaDirNotFound(dir.to_path_buf()));
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(TEMP_PREFIX) {
            debug!(%name, "skipping leftover temp file");
            continue;
        }
        if name.to_lowercase().ends_with(".png") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

pub fn compress(
    options: &CompressOptions,
    progress: Option<Sender<CompressEvent>>,
) -> Result<CompressReport, CompressError> {
    compress_with_backend(&RustBackend::new(), options, progress)
}

/// Recompress using a specific backend (allows testing with mock).
pub fn compress_with_backend(
    backend: &impl ImageBackend,
    options: &CompressOptions,
    progress: Option<Sender<CompressEvent>>,
) -> Result<CompressReport, CompressError> {
    let names = list_pngs(&options.media_dir)?;
    std::fs::create_dir_all(&options.backup_dir)?;
    info!(
        files = names.len(),
        media_dir = %options.media_dir.display(),
        level = %options.level,
        "compressing PNG files"
    );

    let mut manifest = if options.use_cache {
        CacheManifest::load(&options.backup_dir)
    } else {
        CacheManifest::empty()
    };
    let params_hash = cache::hash_compress_params(options.level, options.adaptive_filter);

    let total = names.len();
    let done = AtomicUsize::new(0);
    let results: Vec<(FileReport, Option<String>)> = names
        .par_iter()
        .map(|name| {
            let (outcome, output_hash) =
                compress_one(backend, options, &manifest, &params_hash, name);
            let report = FileReport {
                name: name.clone(),
                outcome,
            };
            if let Some(tx) = &progress {
                let _ = tx.send(CompressEvent {
                    done: done.fetch_add(1, Ordering::SeqCst) + 1,
                    total,
                    file: report.clone(),
                });
            }
            (report, output_hash)
        })
        .collect();

    let mut stats = CacheStats::default();
    let mut files = Vec::with_capacity(results.len());
    for (report, output_hash) in results {
        match &report.outcome {
            FileOutcome::Cached { .. } => stats.hit(),
            FileOutcome::Compressed { .. } => stats.miss(),
            FileOutcome::Failed { .. } => {}
        }
        if let Some(hash) = output_hash {
            manifest.insert(report.name.clone(), hash, params_hash.clone());
        }
        files.push(report);
    }
    manifest.save(&options.backup_dir)?;
    info!(cache = %stats, "compression finished");

    Ok(CompressReport {
        files,
        backup_dir: options.backup_dir.clone(),
        cache: stats,
    })
}

/// Returns the outcome and, on success, the hash of the file now on disk.
fn compress_one(
    backend: &impl ImageBackend,
    options: &CompressOptions,
    manifest: &CacheManifest,
    params_hash: &str,
    name: &str,
) -> (FileOutcome, Option<String>) {
    let input = options.media_dir.join(name);
    let temp = options.media_dir.join(format!("{TEMP_PREFIX}{name}"));
    match try_compress(backend, options, manifest, params_hash, name, &input, &temp) {
        Ok(done) => done,
        Err(e) => {
            warn!(file = name, error = %e, "compression failed");
            if temp.exists() {
                let _ = std::fs::remove_file(&temp);
            }
            (
                FileOutcome::Failed {
                    message: e.to_string(),
                },
                None,
            )
        }
    }
}

fn try_compress(
    backend: &impl ImageBackend,
    options: &CompressOptions,
    manifest: &CacheManifest,
    params_hash: &str,
    name: &str,
    input: &Path,
    temp: &Path,
) -> Result<(FileOutcome, Option<String>), BackendError> {
    let original = std::fs::metadata(input)?.len();

    if options.use_cache {
        let current = cache::hash_file(input)?;
        if manifest.is_fresh(name, &current, params_hash) {
            debug!(file = name, "cache hit");
            return Ok((FileOutcome::Cached { size: original }, Some(current)));
        }
    }

    let backup = options.backup_dir.join(name);
    if !backup.exists() {
        std::fs::copy(input, &backup)?;
    }

    let dims = backend.recompress_png(&RecompressParams {
        source: input.to_path_buf(),
        output: temp.to_path_buf(),
        level: options.level,
        adaptive_filter: options.adaptive_filter,
    })?;
    let compressed = std::fs::metadata(temp)?.len();
    std::fs::rename(temp, input)?;
    debug!(
        file = name,
        width = dims.width,
        height = dims.height,
        original,
        compressed,
        "compressed"
    );

    let output_hash = cache::hash_file(input)?;
    Ok((
        FileOutcome::Compressed {
            original,
            compressed,
        },
        Some(output_hash),
    ))
}
