//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the batch driver in [`process`](crate::process) (which
//! decides which files get sharpened) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing driver logic.
//!
//! ## Types
//!
//! - [`SharpenAmount`]: strength `a` of the high-pass kernel (default 0.45). Any finite value.
//! - [`SharpenParams`]: everything needed for one file: source, output path, amount.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("sharpen amount must be a finite number, got {0}")]
pub struct InvalidAmount(pub f64);

/// Sharpen amount `a`: the kernel uses `1 + 4a` at the centre and `-a` on
/// the four orthogonal neighbours.
///
/// There is no enforced range. `0` is the identity, negative values blur,
/// large values push edges to full contrast.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SharpenAmount(f64);

impl SharpenAmount {
    pub fn new(value: f64) -> Result<Self, InvalidAmount> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(InvalidAmount(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for SharpenAmount {
    fn default() -> Self {
        Self(0.45)
    }
}

impl fmt::Display for SharpenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters for sharpening one file into the output directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SharpenParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub amount: SharpenAmount,
}
