//! 3x3 high-pass sharpening over a [`CanonicalBuffer`].
//!
//! Kernel, applied to each channel independently:
//!
//! ```text
//!  0    -a    0
//! -a  1 + 4a  -a
//!  0    -a    0
//! ```
//!
//! The outer ring of pixels is copied unchanged; the kernel is only evaluated
//! where all four orthogonal neighbours exist. Results are rounded by adding
//! 0.5 and truncating toward zero, then clamped to `0..=255`.
//!
//! Because the weights sum to 1, a flat field is a fixed point for every `a`.

use super::canonical::{BufferError, CHANNELS, CanonicalBuffer};
use super::params::SharpenAmount;

/// Per-pixel weights derived from a sharpen amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel {
    pub center: f64,
    pub side: f64,
}

impl Kernel {
    pub fn new(amount: SharpenAmount) -> Self {
        let a = amount.value();
        Self {
            center: 1.0 + 4.0 * a,
            side: -a,
        }
    }

    #[inline]
    fn apply(self, center: u8, left: u8, right: u8, up: u8, down: u8) -> u8 {
        let neighbours = f64::from(left) + f64::from(right) + f64::from(up) + f64::from(down);
        let value = self.center * f64::from(center) + self.side * neighbours;
        round_clamp(value)
    }
}

/// Round half up by truncation, then clamp into the 8-bit range.
#[inline]
fn round_clamp(value: f64) -> u8 {
    (value + 0.5).trunc().clamp(0.0, 255.0) as u8
}

/// Sharpen `input` into a newly allocated buffer of the same layout.
///
/// The input is never modified. Row padding in the output is zeroed.
pub fn sharpen(
    input: &CanonicalBuffer,
    amount: SharpenAmount,
) -> Result<CanonicalBuffer, BufferError> {
    input.validate()?;

    let (width, height) = (input.width(), input.height());
    let mut output = CanonicalBuffer::with_stride(width, height, input.stride())?;

    // Top and bottom rows are border; so is everything when either side is < 3.
    output.row_mut(0).copy_from_slice(input.row(0));
    if height > 1 {
        let last = height - 1;
        output.row_mut(last).copy_from_slice(input.row(last));
    }
    if width < 3 || height < 3 {
        for y in 1..height.saturating_sub(1) {
            output.row_mut(y).copy_from_slice(input.row(y));
        }
        return Ok(output);
    }

    let kernel = Kernel::new(amount);
    let row_len = width as usize * CHANNELS;
    let last_px = row_len - CHANNELS;

    for y in 1..height - 1 {
        let up = input.row(y - 1);
        let cur = input.row(y);
        let down = input.row(y + 1);
        let out = output.row_mut(y);

        out[..CHANNELS].copy_from_slice(&cur[..CHANNELS]);
        out[last_px..].copy_from_slice(&cur[last_px..]);

        for i in CHANNELS..last_px {
            out[i] = kernel.apply(cur[i], cur[i - CHANNELS], cur[i + CHANNELS], up[i], down[i]);
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(a: f64) -> SharpenAmount {
        SharpenAmount::new(a).unwrap()
    }

    /// Deterministic non-uniform content.
    fn noisy(width: u32, height: u32, stride: usize) -> CanonicalBuffer {
        let mut buf = CanonicalBuffer::with_stride(width, height, stride).unwrap();
        let mut state = 0x2545_f491_u32;
        for y in 0..height {
            for x in 0..width {
                let mut px = [0u8; 3];
                for c in &mut px {
                    state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                    *c = (state >> 24) as u8;
                }
                buf.set_pixel(x, y, px);
            }
        }
        buf
    }

    fn is_border(buf: &CanonicalBuffer, x: u32, y: u32) -> bool {
        x == 0 || y == 0 || x == buf.width() - 1 || y == buf.height() - 1
    }

    #[test]
    fn kernel_weights() {
        let k = Kernel::new(amount(0.45));
        assert!((k.center - 2.8).abs() < 1e-12);
        assert!((k.side + 0.45).abs() < 1e-12);
    }

    #[test]
    fn border_pixels_are_copied() {
        let input = noisy(17, 9, 17 * 3);
        let output = sharpen(&input, amount(0.45)).unwrap();

        for y in 0..input.height() {
            for x in 0..input.width() {
                if is_border(&input, x, y) {
                    assert_eq!(output.pixel(x, y), input.pixel(x, y), "({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn zero_amount_is_identity() {
        let input = noisy(12, 10, 12 * 3);
        let output = sharpen(&input, amount(0.0)).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn flat_field_is_fixed_point() {
        for v in [0u8, 1, 77, 128, 254, 255] {
            for a in [0.45, 1.0, 3.7, 25.0, -0.3] {
                let mut input = CanonicalBuffer::new(6, 5).unwrap();
                for y in 0..5 {
                    for x in 0..6 {
                        input.set_pixel(x, y, [v, v, v]);
                    }
                }
                let output = sharpen(&input, amount(a)).unwrap();
                assert_eq!(output, input, "v={v} a={a}");
            }
        }
    }

    #[test]
    fn interior_matches_formula() {
        let input = noisy(5, 4, 5 * 3);
        let a = 0.45;
        let output = sharpen(&input, amount(a)).unwrap();

        for y in 1..3 {
            for x in 1..4 {
                let p = |x: u32, y: u32| input.pixel(x, y).map(f64::from);
                let (c, l, r, u, d) = (p(x, y), p(x - 1, y), p(x + 1, y), p(x, y - 1), p(x, y + 1));
                for ch in 0..3 {
                    let value = (1.0 + 4.0 * a) * c[ch] - a * (l[ch] + r[ch] + u[ch] + d[ch]);
                    let expected = (value + 0.5).trunc().clamp(0.0, 255.0) as u8;
                    assert_eq!(output.pixel(x, y)[ch], expected, "({x}, {y}) ch {ch}");
                }
            }
        }
    }

    #[test]
    fn clamps_high_to_255() {
        // Bright centre on a dark ring: 2.8 * 200 = 560.
        let mut input = CanonicalBuffer::new(3, 3).unwrap();
        input.set_pixel(1, 1, [200, 200, 200]);
        let output = sharpen(&input, amount(0.45)).unwrap();
        assert_eq!(output.pixel(1, 1), [255, 255, 255]);
    }

    #[test]
    fn clamps_low_to_0() {
        // Dark centre on a bright ring: 2.8 * 10 - 0.45 * 1000 = -422.
        let mut input = CanonicalBuffer::new(3, 3).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                input.set_pixel(x, y, [250, 250, 250]);
            }
        }
        input.set_pixel(1, 1, [10, 10, 10]);
        let output = sharpen(&input, amount(0.45)).unwrap();
        assert_eq!(output.pixel(1, 1), [0, 0, 0]);
    }

    #[test]
    fn channels_are_independent() {
        let mut input = CanonicalBuffer::new(3, 3).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                input.set_pixel(x, y, [100, 0, 255]);
            }
        }
        input.set_pixel(1, 1, [110, 0, 255]);
        let output = sharpen(&input, amount(1.0)).unwrap();
        // red: 5 * 110 - 400 = 150; green and blue are flat.
        assert_eq!(output.pixel(1, 1), [150, 0, 255]);
    }

    #[test]
    fn rounds_half_up() {
        // 1.5 * 11 - 0.125 * 4 * 10 = 11.5 -> 12
        let mut input = CanonicalBuffer::new(3, 3).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                input.set_pixel(x, y, [10, 10, 10]);
            }
        }
        input.set_pixel(1, 1, [11, 11, 11]);
        let output = sharpen(&input, amount(0.125)).unwrap();
        assert_eq!(output.pixel(1, 1), [12, 12, 12]);
    }

    #[test]
    fn round_clamp_edges() {
        assert_eq!(round_clamp(-0.4), 0);
        assert_eq!(round_clamp(-900.0), 0);
        assert_eq!(round_clamp(254.49), 254);
        assert_eq!(round_clamp(254.5), 255);
        assert_eq!(round_clamp(1e12), 255);
    }

    #[test]
    fn padded_stride_preserved_and_padding_not_read() {
        let mut input = noisy(8, 6, 8 * 3 + 5);
        let reference = sharpen(&input, amount(0.45)).unwrap();

        // Scribble over the padding: the pixel result must not change.
        let stride = input.stride();
        let mut bytes = input.as_bytes().to_vec();
        for y in 0..6 {
            for b in &mut bytes[y * stride + 24..(y + 1) * stride] {
                *b = 0xAB;
            }
        }
        input = CanonicalBuffer::from_raw(8, 6, stride, bytes).unwrap();
        let output = sharpen(&input, amount(0.45)).unwrap();

        assert_eq!(output.stride(), stride);
        for y in 0..6 {
            assert_eq!(output.row(y), reference.row(y));
        }
    }

    #[test]
    fn thin_images_are_all_border() {
        for (w, h) in [(1, 1), (1, 7), (7, 1), (2, 2), (2, 9), (9, 2)] {
            let input = noisy(w, h, w as usize * 3);
            let output = sharpen(&input, amount(0.9)).unwrap();
            assert_eq!(output, input, "{w}x{h}");
        }
    }

    #[test]
    fn sharpening_changes_interior_of_noise() {
        let input = noisy(20, 20, 60);
        let output = sharpen(&input, amount(0.45)).unwrap();
        let changed = (1..19)
            .flat_map(|y| (1..19).map(move |x| (x, y)))
            .any(|(x, y)| output.pixel(x, y) != input.pixel(x, y));
        assert!(changed);
        assert_eq!((output.width(), output.height()), (20, 20));
    }
}
