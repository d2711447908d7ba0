//! PNG recompression, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` |
//! | **Encode → PNG** | `image::codecs::png::PngEncoder` with zlib level + row filter |
//!
//! The module is split into:
//! - **Parameters**: Data structures describing the recompression
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use params::{CompressionLevel, RecompressParams};
pub use rust_backend::RustBackend;
