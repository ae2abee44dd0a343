//! Conversion of an arbitrary decoded image into a [`CanonicalBuffer`].
//!
//! | Source layout | Conversion |
//! |---|---|
//! | `Rgb8` | byte-for-byte duplicate |
//! | `La8`, `Rgba8`, `La16`, `Rgba16`, `Rgba32F` | composite over opaque black |
//! | `L8`, `L16`, `Rgb16`, `Rgb32F` | `image` colour conversion to 8-bit RGB |
//!
//! Dimensions never change; no resampling happens here.

use super::canonical::{BufferError, CanonicalBuffer};
use image::{DynamicImage, RgbImage};

/// Produce a canonical buffer with the same width and height as `source`.
pub fn normalize(source: &DynamicImage) -> Result<CanonicalBuffer, BufferError> {
    match source {
        DynamicImage::ImageRgb8(rgb) => CanonicalBuffer::from_rgb_image(rgb),
        img if img.color().has_alpha() => {
            CanonicalBuffer::from_rgb_image(&composite_over_black(img))
        }
        img => CanonicalBuffer::from_rgb_image(&img.to_rgb8()),
    }
}

/// Flatten alpha onto a black canvas: `c' = round(c * a / 255)`.
///
/// 16-bit and float sources are first reduced to 8-bit RGBA.
fn composite_over_black(img: &DynamicImage) -> RgbImage {
    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        image::Rgb([premultiply(r, a), premultiply(g, a), premultiply(b, a)])
    })
}

fn premultiply(channel: u8, alpha: u8) -> u8 {
    ((u16::from(channel) * u16::from(alpha) + 127) / 255) as u8
}
