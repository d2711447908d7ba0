//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the compression job (which decides which files to
//! rewrite) and the [`backend`](super::backend) (which does the pixel work),
//! so the job can be tested against a mock.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// zlib effort for PNG encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    Fast,
    Default,
    #[default]
    Best,
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompressionLevel::Fast => "fast",
            CompressionLevel::Default => "default",
            CompressionLevel::Best => "best",
        })
    }
}

/// Re-encode `source` as PNG into `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecompressParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub level: CompressionLevel,
    /// Pick the row filter per scanline instead of a fixed one.
    pub adaptive_filter: bool,
}
