//! Batch processing of a scanned input directory.
//!
//! For every selected input, in numeric order:
//!
//! ```text
//! bytes < min_bytes  →  copy byte-for-byte to <output_dir>/<filename>
//! otherwise          →  decode → normalize → sharpen → PNG → <output_dir>/<filename>
//! ```
//!
//! ## Failure policy
//!
//! By default the first failing file aborts the run; files already written
//! stay in place. With `keep_going`, a failing file is reported through a
//! [`ProcessEvent::ImageFailed`] event and skipped, and the returned
//! [`RunReport`] records the failure so the caller can still exit non-zero.
//!
//! ## Parallel Processing
//!
//! With more than one worker, files are processed on a
//! [rayon](https://docs.rs/rayon) pool. Each file's pipeline is independent;
//! the report is always in numeric order, progress events arrive in
//! completion order.

use crate::config::{ConfigError, EnhanceConfig, effective_threads};
use crate::imaging::{
    BackendError, Dimensions, ImageBackend, RustBackend, SharpenAmount, SharpenParams,
};
use crate::scan::{self, InputImage, ScanError};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Imaging(#[from] BackendError),
    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Output directory {} is the input directory", .0.display())]
    SameDirectory(PathBuf),
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("{failed} of {total} files failed")]
    FilesFailed { failed: usize, total: usize },
}

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub extension: String,
    pub min_bytes: u64,
    pub amount: SharpenAmount,
    pub threads: usize,
    pub keep_going: bool,
}

impl ProcessConfig {
    /// Build a ProcessConfig from validated EnhanceConfig values.
    pub fn from_config(config: &EnhanceConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            input_dir: config.input_dir.clone(),
            output_dir: config.output_dir.clone(),
            extension: config.extension.clone(),
            min_bytes: config.min_bytes,
            amount: SharpenAmount::new(config.amount)?,
            threads: effective_threads(&config.processing),
            keep_going: config.processing.keep_going,
        })
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        // Stock defaults are always valid.
        let config = EnhanceConfig::default();
        Self {
            input_dir: config.input_dir,
            output_dir: config.output_dir,
            extension: config.extension,
            min_bytes: config.min_bytes,
            amount: SharpenAmount::default(),
            threads: 1,
            keep_going: config.processing.keep_going,
        }
    }
}

/// What happened to a file that was processed successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Outcome {
    /// Below the size threshold: copied unchanged.
    Copied,
    /// Sharpened and re-encoded as PNG.
    Sharpened { width: u32, height: u32 },
}

/// Progress events streamed to the caller while the batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    Started {
        input_dir: String,
        count: usize,
    },
    ImageDone {
        /// 1-based position in numeric order.
        index: usize,
        filename: String,
        bytes: u64,
        outcome: Outcome,
    },
    ImageFailed {
        index: usize,
        filename: String,
        error: String,
    },
}

/// Per-file entry of the run report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub index: usize,
    pub filename: String,
    pub bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a batch run, serializable as the `--report` JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub amount: f64,
    pub min_bytes: u64,
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn copied(&self) -> usize {
        self.count(|f| f.outcome == Some(Outcome::Copied))
    }

    pub fn sharpened(&self) -> usize {
        self.count(|f| matches!(f.outcome, Some(Outcome::Sharpened { .. })))
    }

    pub fn failed(&self) -> usize {
        self.count(|f| f.error.is_some())
    }

    /// `Err(FilesFailed)` if any file was skipped under `keep_going`.
    pub fn check(&self) -> Result<(), ProcessError> {
        match self.failed() {
            0 => Ok(()),
            failed => Err(ProcessError::FilesFailed {
                failed,
                total: self.files.len(),
            }),
        }
    }

    fn count(&self, pred: impl Fn(&FileReport) -> bool) -> usize {
        self.files.iter().filter(|f| pred(f)).count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sharpened, {} copied",
            self.sharpened(),
            self.copied()
        )?;
        if self.failed() > 0 {
            write!(f, ", {} failed", self.failed())?;
        }
        write!(f, " ({} total)", self.files.len())
    }
}

/// Run the batch with the production [`RustBackend`].
pub fn process(
    config: &ProcessConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunReport, ProcessError> {
    let backend = RustBackend::new();
    process_with_backend(&backend, config, events)
}

/// Run the batch using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    config: &ProcessConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunReport, ProcessError> {
    let inputs = scan::scan(&config.input_dir, &config.extension)?;
    prepare_output_dir(config)?;

    debug!(
        count = inputs.len(),
        threads = config.threads,
        output = %config.output_dir.display(),
        "selected inputs"
    );
    emit(
        &events,
        ProcessEvent::Started {
            input_dir: config.input_dir.display().to_string(),
            count: inputs.len(),
        },
    );

    let run = |(i, input): (usize, &InputImage)| {
        process_one(backend, config, i + 1, input, &events)
    };
    let files = if config.threads <= 1 {
        inputs
            .iter()
            .enumerate()
            .map(run)
            .collect::<Result<Vec<_>, _>>()?
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;
        pool.install(|| {
            inputs
                .par_iter()
                .enumerate()
                .map(run)
                .collect::<Result<Vec<_>, _>>()
        })?
    };

    Ok(RunReport {
        input_dir: config.input_dir.clone(),
        output_dir: config.output_dir.clone(),
        amount: config.amount.value(),
        min_bytes: config.min_bytes,
        files,
    })
}

/// Copy or sharpen a single file. Under `keep_going`, failures are folded
/// into the returned report entry instead of being propagated.
fn process_one(
    backend: &impl ImageBackend,
    config: &ProcessConfig,
    index: usize,
    input: &InputImage,
    events: &Option<Sender<ProcessEvent>>,
) -> Result<FileReport, ProcessError> {
    let output = config.output_dir.join(&input.filename);
    let mut report = FileReport {
        index,
        filename: input.filename.clone(),
        bytes: input.bytes,
        outcome: None,
        error: None,
    };

    match transform(backend, config, input, &output) {
        Ok(outcome) => {
            debug!(file = %input.filename, ?outcome, "done");
            emit(
                events,
                ProcessEvent::ImageDone {
                    index,
                    filename: input.filename.clone(),
                    bytes: input.bytes,
                    outcome,
                },
            );
            report.outcome = Some(outcome);
            Ok(report)
        }
        Err(e) if config.keep_going => {
            warn!(file = %input.filename, error = %e, "skipping file");
            emit(
                events,
                ProcessEvent::ImageFailed {
                    index,
                    filename: input.filename.clone(),
                    error: e.to_string(),
                },
            );
            report.error = Some(e.to_string());
            Ok(report)
        }
        Err(e) => Err(e),
    }
}

fn transform(
    backend: &impl ImageBackend,
    config: &ProcessConfig,
    input: &InputImage,
    output: &Path,
) -> Result<Outcome, ProcessError> {
    if input.bytes < config.min_bytes {
        std::fs::copy(&input.path, output).map_err(|source| ProcessError::Copy {
            from: input.path.clone(),
            to: output.to_path_buf(),
            source,
        })?;
        return Ok(Outcome::Copied);
    }

    let Dimensions { width, height } = backend.sharpen(&SharpenParams {
        source: input.path.clone(),
        output: output.to_path_buf(),
        amount: config.amount,
    })?;
    Ok(Outcome::Sharpened { width, height })
}

/// Create the output directory and make sure it is not the input directory
/// under another spelling (`..`, relative vs absolute, symlinks).
fn prepare_output_dir(config: &ProcessConfig) -> Result<(), ProcessError> {
    let output_error = |source| ProcessError::OutputDir {
        path: config.output_dir.clone(),
        source,
    };
    std::fs::create_dir_all(&config.output_dir).map_err(output_error)?;
    let output = std::fs::canonicalize(&config.output_dir).map_err(output_error)?;
    let input = std::fs::canonicalize(&config.input_dir).map_err(|source| ScanError::Io {
        path: config.input_dir.clone(),
        source,
    })?;
    if input == output {
        return Err(ProcessError::SameDirectory(config.output_dir.clone()));
    }
    Ok(())
}

fn emit(events: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is printing progress.
        let _ = tx.send(event);
    }
}
