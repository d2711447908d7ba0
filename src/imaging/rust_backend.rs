//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, WebP) | `image` crate (pure Rust decoders) |
//! | Encode → PNG | `image::codecs::png::PngEncoder::new_with_quality` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{CompressionLevel, RecompressParams};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

fn compression_type(level: CompressionLevel) -> CompressionType {
    match level {
        CompressionLevel::Fast => CompressionType::Fast,
        CompressionLevel::Default => CompressionType::Default,
        CompressionLevel::Best => CompressionType::Best,
    }
}

fn filter_type(adaptive: bool) -> FilterType {
    if adaptive {
        FilterType::Adaptive
    } else {
        FilterType::Sub
    }
}

/// Encode and save as PNG.
fn save_png(
    img: &DynamicImage,
    path: &Path,
    level: CompressionLevel,
    adaptive_filter: bool,
) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    let encoder =
        PngEncoder::new_with_quality(writer, compression_type(level), filter_type(adaptive_filter));
    img.write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn recompress_png(&self, params: &RecompressParams) -> Result<Dimensions, BackendError> {
        let img = load_image(&params.source)?;
        save_png(&img, &params.output, params.level, params.adaptive_filter)?;
        Ok(Dimensions {
            width: img.width(),
            height: img.height(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageEncoder, RgbaImage};

    /// Write a loosely compressed PNG so there is something to win.
    fn create_test_png(path: &Path, width: u32, height: u32) {
        let img = RgbaImage::from_fn(width, height, |x, _| {
            image::Rgba([(x % 4) as u8 * 60, 40, 200, 255])
        });
        let file = std::fs::File::create(path).unwrap();
        let writer = std::io::BufWriter::new(file);
        PngEncoder::new_with_quality(writer, CompressionType::Fast, FilterType::NoFilter)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)
            .unwrap();
    }

    fn params(source: &Path, output: &Path) -> RecompressParams {
        RecompressParams {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            level: CompressionLevel::Best,
            adaptive_filter: true,
        }
    }

    #[test]
    fn recompress_preserves_pixels_and_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("in.png");
        let output = tmp.path().join("out.png");
        create_test_png(&source, 64, 48);

        let dims = RustBackend::new()
            .recompress_png(&params(&source, &output))
            .unwrap();
        assert_eq!(
            dims,
            Dimensions {
                width: 64,
                height: 48
            }
        );

        let before = image::open(&source).unwrap().to_rgba8();
        let after = image::open(&output).unwrap().to_rgba8();
        assert_eq!(before, after);
    }

    #[test]
    fn best_level_does_not_grow_a_fast_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("in.png");
        let output = tmp.path().join("out.png");
        create_test_png(&source, 256, 256);

        RustBackend::new()
            .recompress_png(&params(&source, &output))
            .unwrap();
        let original = std::fs::metadata(&source).unwrap().len();
        let compressed = std::fs::metadata(&output).unwrap().len();
        assert!(compressed <= original, "{compressed} > {original}");
    }

    #[test]
    fn recompress_nonexistent_file_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = RustBackend::new().recompress_png(&params(
            Path::new("/nonexistent/image.png"),
            &tmp.path().join("out.png"),
        ));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn recompress_garbage_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("bad.png");
        std::fs::write(&source, b"not a png").unwrap();
        let result =
            RustBackend::new().recompress_png(&params(&source, &tmp.path().join("out.png")));
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }
}
