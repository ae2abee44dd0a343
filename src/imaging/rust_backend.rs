//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Step | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Normalize | [`normalize`](super::normalize::normalize) → [`CanonicalBuffer`](super::CanonicalBuffer) |
//! | Sharpen | [`sharpen`](super::sharpen::sharpen) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//!
//! Each stage owns its buffer and hands it to the next; the decoded image
//! and the normalized buffer are dropped as soon as the following stage has
//! produced its output.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::normalize::normalize;
use super::params::SharpenParams;
use super::sharpen::sharpen;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageEncoder, ImageReader, RgbImage};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
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
///
/// The format is sniffed from the file contents so a mislabelled extension
/// still decodes.
pub fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    let invalid = |reason: String| BackendError::InvalidImage {
        path: path.to_path_buf(),
        reason,
    };
    ImageReader::open(path)
        .map_err(|source| BackendError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .with_guessed_format()
        .map_err(|e| invalid(e.to_string()))?
        .decode()
        .map_err(|e| invalid(e.to_string()))
}

/// Encode an RGB image as PNG at `path`, replacing any existing file.
pub fn save_png(img: &RgbImage, path: &Path) -> Result<(), BackendError> {
    let write_error = |reason: String| BackendError::WriteError {
        path: path.to_path_buf(),
        reason,
    };
    let file = std::fs::File::create(path).map_err(|e| write_error(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    PngEncoder::new(&mut writer)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| write_error(e.to_string()))?;
    writer.flush().map_err(|e| write_error(e.to_string()))
}

impl ImageBackend for RustBackend {
    fn sharpen(&self, params: &SharpenParams) -> Result<Dimensions, BackendError> {
        let started = Instant::now();
        let decoded = load_image(&params.source)?;
        debug!(
            path = %params.source.display(),
            color = ?decoded.color(),
            width = decoded.width(),
            height = decoded.height(),
            elapsed = ?started.elapsed(),
            "decoded"
        );

        let canonical = normalize(&decoded)?;
        drop(decoded);

        let started = Instant::now();
        let sharpened = sharpen(&canonical, params.amount)?;
        drop(canonical);
        debug!(amount = %params.amount, elapsed = ?started.elapsed(), "sharpened");

        let dims = Dimensions {
            width: sharpened.width(),
            height: sharpened.height(),
        };
        save_png(&sharpened.into_rgb_image()?, &params.output)?;
        debug!(path = %params.output.display(), "encoded");
        Ok(dims)
    }
}
