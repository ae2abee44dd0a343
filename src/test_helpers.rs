//! Shared test utilities for the sharpen-batch test suite.
//!
//! Builds synthetic images and input directories inside temp dirs so tests
//! never depend on checked-in fixtures.

use image::{ImageEncoder, RgbImage};
use std::fs;
use std::path::Path;

// =========================================================================
// Synthetic images
// =========================================================================

/// Deterministic pseudo-random RGB content (LCG seeded by `seed`).
///
/// Noise is incompressible, so PNG size grows with pixel count, and every
/// interior pixel differs from its neighbours.
pub fn noise_rgb(width: u32, height: u32, seed: u32) -> RgbImage {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    RgbImage::from_fn(width, height, |_, _| {
        let mut px = [0u8; 3];
        for c in &mut px {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            *c = (state >> 24) as u8;
        }
        image::Rgb(px)
    })
}

/// Encode `img` as PNG at `path`.
pub fn write_png(path: &Path, img: &RgbImage) {
    let file = fs::File::create(path).unwrap();
    image::codecs::png::PngEncoder::new(std::io::BufWriter::new(file))
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgb8,
        )
        .unwrap();
}

// =========================================================================
// Fixture directories
// =========================================================================

/// Create `dir` (with parents) containing zero-filled files of the given sizes.
///
/// Contents are not valid images; use with the mock backend.
pub fn setup_input_dir(dir: &Path, files: &[(&str, usize)]) {
    fs::create_dir_all(dir).unwrap();
    for (name, len) in files {
        fs::write(dir.join(name), vec![0u8; *len]).unwrap();
    }
}
