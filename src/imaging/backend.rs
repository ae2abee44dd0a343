//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between the batch driver and the
//! pixel work: decode → normalize → sharpen → encode for a single file.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests drive the batch logic through [`tests::MockBackend`] instead.

use super::canonical::BufferError;
use super::params::SharpenParams;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid image {}: {reason}", path.display())]
    InvalidImage { path: PathBuf, reason: String },
    #[error(transparent)]
    InvalidBuffer(#[from] BufferError),
    #[error("Failed to write {}: {reason}", path.display())]
    WriteError { path: PathBuf, reason: String },
}

/// Width and height of a processed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` so a single backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    /// Decode `params.source`, sharpen it and write PNG to `params.output`.
    ///
    /// Returns the dimensions of the written image, which always equal the
    /// source dimensions.
    fn sharpen(&self, params: &SharpenParams) -> Result<Dimensions, BackendError>;
}
