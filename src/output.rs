//! CLI output formatting.
//!
//! Each progress event is rendered by a pure `format_*` function returning
//! display lines, so the formatting is testable without capturing stdout.
//!
//! ```text
//! Enhancing 3 images from imagenes
//! 001 1.png (120.0 KB) copied
//! 002 2.png (200.0 KB) sharpened 640x480
//! 003 10.png FAILED
//!     Invalid image imagenes/10.png: ...
//! Done: 1 sharpened, 1 copied, 1 failed (3 total) → imagenes/enhanced
//! ```

use crate::process::{Outcome, ProcessEvent, RunReport};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Human-readable byte size (decimal units, one decimal place).
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1000 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1000.0;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started { input_dir, count } => {
            let noun = if *count == 1 { "image" } else { "images" };
            vec![format!("Enhancing {} {} from {}", count, noun, input_dir)]
        }
        ProcessEvent::ImageDone {
            index,
            filename,
            bytes,
            outcome,
        } => {
            let action = match outcome {
                Outcome::Copied => "copied".to_string(),
                Outcome::Sharpened { width, height } => format!("sharpened {}x{}", width, height),
            };
            vec![format!(
                "{} {} ({}) {}",
                format_index(*index),
                filename,
                format_bytes(*bytes),
                action
            )]
        }
        ProcessEvent::ImageFailed {
            index,
            filename,
            error,
        } => vec![
            format!("{} {} FAILED", format_index(*index), filename),
            format!("    {}", error),
        ],
    }
}

/// Final summary line for a finished run.
pub fn format_summary(report: &RunReport) -> String {
    format!("Done: {} \u{2192} {}", report, report.output_dir.display())
}

/// Print one event to stdout.
pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}
