//! The canonical pixel buffer shared by the normalizer and the sharpen filter.
//!
//! A [`CanonicalBuffer`] is always 3 channels, 8 bits per channel, no alpha,
//! row-major with an explicit stride:
//!
//! ```text
//! offset(x, y, c) = y * stride + x * 3 + c      0 <= c < 3
//! stride >= width * 3                           trailing bytes are padding
//! data.len() == stride * height
//! ```
//!
//! Padding bytes are carried along but never read by the filter. Every
//! constructor validates the layout, so any buffer that exists is safe to
//! index with the formula above.

use image::RgbImage;
use thiserror::Error;

/// Bytes per pixel in the canonical layout.
pub const CHANNELS: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Invalid buffer: dimensions must be positive (got {width}x{height})")]
    EmptyDimensions { width: u32, height: u32 },
    #[error("Invalid buffer: stride {stride} is shorter than {width} pixels x 3 bytes")]
    StrideTooShort { width: u32, stride: usize },
    #[error("Invalid buffer: expected {expected} bytes ({stride} x {height}), got {actual}")]
    LengthMismatch {
        stride: usize,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalBuffer {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl CanonicalBuffer {
    /// Allocate a zero-filled buffer with a tight stride (`width * 3`).
    pub fn new(width: u32, height: u32) -> Result<Self, BufferError> {
        Self::with_stride(width, height, width as usize * CHANNELS)
    }

    /// Allocate a zero-filled buffer with an explicit (possibly padded) stride.
    pub fn with_stride(width: u32, height: u32, stride: usize) -> Result<Self, BufferError> {
        let len = stride
            .checked_mul(height as usize)
            .ok_or(BufferError::StrideTooShort { width, stride })?;
        Self::from_raw(width, height, stride, vec![0; len])
    }

    /// Wrap existing bytes, validating the layout invariants.
    pub fn from_raw(
        width: u32,
        height: u32,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self, BufferError> {
        check_layout(width, height, stride, data.len())?;
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Copy an `RgbImage` into a tightly packed buffer.
    pub fn from_rgb_image(img: &RgbImage) -> Result<Self, BufferError> {
        let (width, height) = img.dimensions();
        Self::from_raw(width, height, width as usize * CHANNELS, img.as_raw().clone())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw bytes including any row padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Re-check the layout invariants.
    pub fn validate(&self) -> Result<(), BufferError> {
        check_layout(self.width, self.height, self.stride, self.data.len())
    }

    /// Pixel bytes of row `y`, padding excluded.
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.row_bytes()]
    }

    /// Mutable pixel bytes of row `y`, padding excluded.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let len = self.row_bytes();
        &mut self.data[start..start + len]
    }

    /// The three channel values of pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = x as usize * CHANNELS;
        let row = self.row(y);
        [row[i], row[i + 1], row[i + 2]]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, value: [u8; 3]) {
        let i = x as usize * CHANNELS;
        self.row_mut(y)[i..i + CHANNELS].copy_from_slice(&value);
    }

    /// Repack into a tight `RgbImage` for encoding, dropping row padding.
    pub fn into_rgb_image(self) -> Result<RgbImage, BufferError> {
        self.validate()?;
        let (width, height) = (self.width, self.height);
        let tight = self.row_bytes();
        let raw: Vec<u8> = if self.stride == tight {
            self.data
        } else {
            (0..height).flat_map(|y| self.row(y).to_vec()).collect()
        };
        let actual = raw.len();
        RgbImage::from_raw(width, height, raw).ok_or(BufferError::LengthMismatch {
            stride: tight,
            height,
            expected: tight * height as usize,
            actual,
        })
    }

    fn row_bytes(&self) -> usize {
        self.width as usize * CHANNELS
    }
}

fn check_layout(width: u32, height: u32, stride: usize, len: usize) -> Result<(), BufferError> {
    if width == 0 || height == 0 {
        return Err(BufferError::EmptyDimensions { width, height });
    }
    if stride < width as usize * CHANNELS {
        return Err(BufferError::StrideTooShort { width, stride });
    }
    let expected = stride
        .checked_mul(height as usize)
        .ok_or(BufferError::StrideTooShort { width, stride })?;
    if len != expected {
        return Err(BufferError::LengthMismatch {
            stride,
            height,
            expected,
            actual: len,
        });
    }
    Ok(())
}
