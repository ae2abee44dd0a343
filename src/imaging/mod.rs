//! Image processing: normalization and sharpening.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image` crate (PNG out) |
//! | **Normalize** | [`normalize`] → [`CanonicalBuffer`] |
//! | **Sharpen** | [`sharpen`]: 3x3 high-pass over the canonical buffer |
//!
//! The module is split into:
//! - **Canonical buffer**: the 3-channel 8-bit strided layout both stages agree on
//! - **Normalize / Sharpen**: pure functions over in-memory pixels (unit testable)
//! - **Parameters**: Data structures describing a sharpen job
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod canonical;
pub mod normalize;
mod params;
pub mod rust_backend;
pub mod sharpen;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use canonical::{BufferError, CanonicalBuffer};
pub use normalize::normalize;
pub use params::{InvalidAmount, SharpenAmount, SharpenParams};
pub use rust_backend::RustBackend;
pub use sharpen::sharpen;
