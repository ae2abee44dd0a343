//! Fixtures shared with the unit tests, so image generators live in one place.

#[allow(dead_code)]
#[path = "../../src/test_helpers.rs"]
mod test_helpers;

pub use test_helpers::{noise_rgb, write_png};
