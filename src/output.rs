//! CLI output formatting for batch runs.
//!
//! # Entity Display Contract
//!
//! Every image follows the same two-level pattern:
//!
//! 1. **Header line**: positional index + file name
//! 2. **Context lines**: indented preview metadata or the failure reason
//!
//! # Output Format
//!
//! ## Process
//!
//! ```text
//! Processing 3 images
//! 001 dawn.jpg → out/processed_dawn.jpg
//!     File Name: dawn.jpg
//!     Original Size: 2483021 bytes
//!     Processed Size: 412877 bytes
//!     Width: 2048 px
//!     Height: 1365 px
//! 002 notes.txt
//!     Error: Unsupported file type: image/txt
//! Processed 1 image, 1 failed, 1 cancelled
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 dawn.jpg: image/jpeg
//! 002 notes.txt: Unsupported file type: image/txt
//! 003 IMG_0001.HEIC: image/heic (needs external conversion)
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure —
//! no I/O, no side effects.

use crate::batch::{BatchEvent, ImageSummary, ProcessError};
use crate::formats::MediaType;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// Preview metadata for one processed image, one field per line.
pub fn format_summary(summary: &ImageSummary) -> Vec<String> {
    vec![
        format!("File Name: {}", summary.name),
        format!("Original Size: {} bytes", summary.original_size),
        format!("Processed Size: {} bytes", summary.processed_size),
        format!("Width: {} px", summary.width),
        format!("Height: {} px", summary.height),
    ]
}

// ============================================================================
// Process
// ============================================================================

/// Format one progress event. `index` in events is 0-based; display is 1-based.
pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Started { total } => {
            vec![format!("Processing {}", plural(*total, "image"))]
        }
        BatchEvent::ImageProcessed { index, summary } => {
            let mut lines = vec![format!(
                "{} {} → {}",
                format_index(index + 1),
                summary.name,
                summary.output.display()
            )];
            lines.extend(
                format_summary(summary)
                    .into_iter()
                    .map(|l| format!("{}{}", indent(1), l)),
            );
            lines
        }
        BatchEvent::ImageFailed { index, name, error } => vec![
            format!("{} {}", format_index(index + 1), name),
            format!("{}Error: {}", indent(1), error),
        ],
        BatchEvent::Finished {
            succeeded,
            failed,
            cancelled,
        } => {
            let mut line = format!("Processed {}", plural(*succeeded, "image"));
            if *failed > 0 {
                line.push_str(&format!(", {} failed", failed));
            }
            if *cancelled > 0 {
                line.push_str(&format!(", {} cancelled", cancelled));
            }
            vec![line]
        }
    }
}

pub fn print_batch_event(event: &BatchEvent) {
    for line in format_batch_event(event) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format screening results, one line per input.
///
/// Accepted types the built-in codec cannot decode are flagged.
pub fn format_check_output<P: AsRef<Path>>(
    results: &[(P, Result<MediaType, ProcessError>)],
) -> Vec<String> {
    results
        .iter()
        .enumerate()
        .map(|(i, (path, result))| {
            let path = path.as_ref();
            let name = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            match result {
                Ok(media_type) if media_type.needs_conversion() => format!(
                    "{} {}: {} (needs external conversion)",
                    format_index(i + 1),
                    name,
                    media_type
                ),
                Ok(media_type) => format!("{} {}: {}", format_index(i + 1), name, media_type),
                Err(e) => format!("{} {}: {}", format_index(i + 1), name, e),
            }
        })
        .collect()
}

pub fn print_check_output<P: AsRef<Path>>(results: &[(P, Result<MediaType, ProcessError>)]) {
    for line in format_check_output(results) {
        println!("{}", line);
    }
}
