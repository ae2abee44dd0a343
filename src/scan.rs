//! Input directory scanning.
//!
//! Selects the batch inputs from a single directory (no recursion):
//!
//! ```text
//! imagenes/
//! ├── 1.png           # input #1
//! ├── 2.png           # input #2
//! ├── 10.png          # input #3 (numeric, not lexical, order)
//! ├── cover.png       # ignored: stem is not all digits
//! ├── 3.jpg           # ignored: wrong extension
//! └── enhanced/       # ignored: directories are never inputs
//! ```
//!
//! ## Validation
//!
//! - The input directory must exist ([`ScanError::NoInputDirectory`])
//! - At least one file must match ([`ScanError::NoInputFiles`])

use crate::naming::{NumericKey, parse_numbered_file};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read input directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Input directory not found: {}", .0.display())]
    NoInputDirectory(PathBuf),
    #[error("No files matching <digits>.{extension} in {}", dir.display())]
    NoInputFiles { dir: PathBuf, extension: String },
}

/// A selected input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputImage {
    pub key: NumericKey,
    /// File name only, reused verbatim for the output file.
    pub filename: String,
    pub path: PathBuf,
    /// Byte length at scan time.
    pub bytes: u64,
}

/// List `<digits>.<extension>` files directly inside `dir`, in ascending
/// numeric order. Equal numbers (`1.png`, `01.png`) are ordered by name.
pub fn scan(dir: &Path, extension: &str) -> Result<Vec<InputImage>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::NoInputDirectory(dir.to_path_buf()));
    }

    let mut inputs = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(filename) = entry.file_name().to_str() else {
            continue;
        };
        let Some(key) = parse_numbered_file(filename, extension) else {
            continue;
        };
        let bytes = std::fs::metadata(path)
            .map_err(|source| ScanError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        inputs.push(InputImage {
            key,
            filename: filename.to_string(),
            path: path.to_path_buf(),
            bytes,
        });
    }

    if inputs.is_empty() {
        return Err(ScanError::NoInputFiles {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    inputs.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.filename.cmp(&b.filename)));
    Ok(inputs)
}
