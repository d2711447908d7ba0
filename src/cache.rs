//! Recompression cache.
//!
//! Re-encoding a PNG at the best zlib level is slow, and running the job twice
//! over the same media directory would recompress files that are already the
//! product of a previous run. This module lets the compress job skip those.
//!
//! # Design
//!
//! The cache is **content-addressed**: each entry records the SHA-256 of the
//! file the job *wrote*, together with a hash of the encoding parameters.
//! A file is skipped when its current contents hash to the recorded output
//! and the parameters are unchanged. Anything else (a new file, a file
//! replaced by a fresh export, a different compression level) is
//! recompressed.
//!
//! - **`output_hash`**: SHA-256 of the compressed file. Content-based rather
//!   than mtime-based so it survives `git checkout`.
//! - **`params_hash`**: SHA-256 of (level, adaptive filter).
//!
//! ## Storage
//!
//! The manifest is a JSON file at `<backup_dir>/.compress-cache.json`, next to
//! the originals it was produced from.
//!
//! ## Bypassing the cache
//!
//! Pass `--no-cache` to `compress` to recompress everything. This loads an
//! empty manifest; the new results are still recorded.

use crate::imaging::CompressionLevel;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the cache manifest file within the backup directory.
const MANIFEST_FILENAME: &str = ".compress-cache.json";

/// Version of the cache manifest format. Bump this to invalidate all
/// existing caches when the format or key computation changes.
const MANIFEST_VERSION: u32 = 1;

/// A single compressed file.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    pub output_hash: String,
    pub params_hash: String,
}

/// On-disk manifest mapping media file names to what the job last wrote.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CacheManifest {
    pub version: u32,
    pub entries: HashMap<String, CacheEntry>,
}

impl CacheManifest {
    /// Create an empty manifest (used for `--no-cache` or the first run).
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: HashMap::new(),
        }
    }

    /// Load from the backup directory. Returns an empty manifest if the
    /// file doesn't exist or can't be parsed (version mismatch, corruption).
    pub fn load(dir: &Path) -> Self {
        let content = match std::fs::read_to_string(manifest_path(dir)) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(m) if m.version == MANIFEST_VERSION => m,
            _ => Self::empty(),
        }
    }

    /// Save to the backup directory.
    pub fn save(&self, dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(manifest_path(dir), json)
    }

    /// True when `file_name` currently hashes to what the job last wrote
    /// with the same parameters.
    pub fn is_fresh(&self, file_name: &str, current_hash: &str, params_hash: &str) -> bool {
        self.entries
            .get(file_name)
            .is_some_and(|e| e.output_hash == current_hash && e.params_hash == params_hash)
    }

    /// Record the output written for `file_name`.
    pub fn insert(&mut self, file_name: String, output_hash: String, params_hash: String) {
        self.entries.insert(
            file_name,
            CacheEntry {
                output_hash,
                params_hash,
            },
        );
    }
}

/// SHA-256 hash of a file's contents, returned as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

/// SHA-256 hash of the PNG encoding parameters.
pub fn hash_compress_params(level: CompressionLevel, adaptive_filter: bool) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"png\0");
    hasher.update(level.to_string().as_bytes());
    hasher.update([u8::from(adaptive_filter)]);
    format!("{:x}", hasher.finalize())
}

/// Summary of cache performance for a compression run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} compressed ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(f, "{} compressed", self.misses)
        }
    }
}

/// Resolve the cache manifest path for a backup directory.
pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILENAME)
}
