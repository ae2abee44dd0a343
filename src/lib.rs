//! # sharpen-batch
//!
//! Batch sharpening for a directory of numerically named raster images.
//! Files at or above a size threshold are sharpened with a fixed 3x3 kernel
//! and re-encoded as PNG; smaller files are copied unchanged. Output keeps the
//! original filenames, and files are handled in numeric order
//! (`1.png`, `2.png`, `10.png`).
//!
//! # Pipeline
//!
//! ```text
//! scan       imagenes/            →  [1.png, 2.png, 10.png]   (numeric order)
//! process    each input           →  copy (bytes < min_bytes)
//!                                     or decode → normalize → sharpen → PNG
//! output     progress events      →  stdout lines + optional JSON report
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Canonical RGB8 buffer, format normalizer, sharpen filter, `image`-crate backend |
//! | [`scan`] | Selects `<digits>.<ext>` inputs and sorts them numerically |
//! | [`naming`] | Digit-run parsing and overflow-free numeric sort keys |
//! | [`process`] | Size-gated bypass, per-file pipeline, fail-fast or keep-going, run report |
//! | [`config`] | Layered configuration: defaults → TOML file → CLI flags |
//! | [`output`] | CLI output formatting of progress events |
//! | [`logger`] | `tracing` subscriber for diagnostics |
//!
//! # Design Decisions
//!
//! ## One Canonical Layout
//!
//! Every decoded image, whatever its colour type or bit depth, is first
//! normalized into a [`CanonicalBuffer`](imaging::CanonicalBuffer): 3 channels,
//! 8 bits each, explicit stride. The filter only ever sees that layout, so it
//! indexes raw rows directly instead of matching on pixel formats.
//!
//! ## Border Pixels Are Never Sharpened
//!
//! The kernel needs all four orthogonal neighbours. Rather than inventing
//! them (mirroring, clamping), the outer ring is copied verbatim. Images one
//! or two pixels wide or tall are therefore returned unchanged.
//!
//! ## Fail Fast by Default
//!
//! The first failing file aborts the run, leaving already written files in
//! place. `keep_going` turns per-file failures into report entries; the run
//! still exits non-zero.

pub mod config;
pub mod imaging;
pub mod logger;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
