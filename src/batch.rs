//! Batch processing over many input files.
//!
//! Each input is an independent task: screen (format + size), read, decode,
//! optionally crop, run the pipeline, encode, write. Tasks share nothing but
//! the codec and the options, so they fan out across a bounded rayon pool
//! with no coordination.
//!
//! ## Guarantees
//!
//! - At most `threads` images are in flight at once.
//! - A failing image never affects its siblings; its error is reported in
//!   its own slot.
//! - Results come back in input order, one per input.
//! - Cancellation is checked before each task starts. Tasks already running
//!   finish; tasks not yet started report [`ProcessError::Cancelled`].
//! - Exactly one [`BatchEvent::Finished`] is sent, after every task is done.
//! - Two inputs never write the same output file. When names clash (say
//!   `dawn.jpg` and `dawn.png`), the first input in order keeps the name and
//!   later ones fail with [`ProcessError::OutputConflict`].
//!
//! ## Output Structure
//!
//! ```text
//! <output_dir>/
//! ├── processed_dawn.jpg
//! ├── processed_dusk.jpg
//! └── ...
//! ```

use crate::formats::{self, InputError, MediaType};
use crate::imaging::crop::crop;
use crate::imaging::{CropRegion, ImageCodec, ImagingError, ProcessingParameters, process_decoded};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Per-image failure. Never aborts the batch.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] ImagingError),
    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },
    #[error("Unsupported file type: {0}")]
    Unsupported(String),
    #[error("Output {} is already written by {}", .output.display(), .first.display())]
    OutputConflict { output: PathBuf, first: PathBuf },
    #[error("Cancelled before start")]
    Cancelled,
}

impl From<InputError> for ProcessError {
    fn from(err: InputError) -> Self {
        match err {
            InputError::Unsupported(t) => Self::Unsupported(t),
            InputError::TooLarge { size, limit } => Self::TooLarge { size, limit },
        }
    }
}

/// Failure to set up the batch itself.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared flag for aborting a batch. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Tasks that have not started will be skipped.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Settings shared by every task in a batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub params: ProcessingParameters,
    /// Worker count; at least one.
    pub threads: usize,
    pub output_dir: PathBuf,
    /// Prepended to each output file stem.
    pub prefix: String,
    pub max_file_size: u64,
    /// Region cut from every image after decode, before resize.
    pub crop: Option<CropRegion>,
    /// Declared media type for every input; overrides the extension.
    pub media_type: Option<MediaType>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            params: ProcessingParameters::default(),
            threads: 1,
            output_dir: PathBuf::from("."),
            prefix: "processed_".to_string(),
            max_file_size: formats::DEFAULT_MAX_FILE_SIZE,
            crop: None,
            media_type: None,
        }
    }
}

impl BatchOptions {
    /// Output path for an input: `<output_dir>/<prefix><stem>.jpg`.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        self.output_dir.join(format!("{}{}.jpg", self.prefix, stem))
    }
}

/// Preview metadata for one processed image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSummary {
    /// Input file name, without directories.
    pub name: String,
    pub source: PathBuf,
    pub output: PathBuf,
    pub media_type: MediaType,
    pub original_size: usize,
    pub processed_size: usize,
    pub width: u32,
    pub height: u32,
}

/// Progress events emitted during [`run_batch`].
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Started {
        total: usize,
    },
    ImageProcessed {
        index: usize,
        summary: ImageSummary,
    },
    ImageFailed {
        index: usize,
        name: String,
        error: String,
    },
    Finished {
        succeeded: usize,
        failed: usize,
        cancelled: usize,
    },
}

/// Ordered outcome of a batch: `results[i]` belongs to `inputs[i]`.
#[derive(Debug)]
pub struct BatchReport {
    pub inputs: Vec<PathBuf>,
    pub results: Vec<Result<ImageSummary, ProcessError>>,
}

#[derive(Serialize)]
struct ReportEntry<'a> {
    input: &'a Path,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a ImageSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn cancelled(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, Err(ProcessError::Cancelled)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded() - self.cancelled()
    }

    /// Pretty JSON, one entry per input in input order.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let entries: Vec<ReportEntry> = self
            .inputs
            .iter()
            .zip(&self.results)
            .map(|(input, result)| match result {
                Ok(summary) => ReportEntry {
                    input,
                    status: "processed",
                    summary: Some(summary),
                    error: None,
                },
                Err(ProcessError::Cancelled) => ReportEntry {
                    input,
                    status: "cancelled",
                    summary: None,
                    error: None,
                },
                Err(e) => ReportEntry {
                    input,
                    status: "failed",
                    summary: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();
        serde_json::to_string_pretty(&entries)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Check that an input exists, has an accepted type, and fits the size limit.
///
/// A `declared` type is trusted over the file extension.
pub fn screen_input(
    path: &Path,
    max_file_size: u64,
    declared: Option<MediaType>,
) -> Result<MediaType, ProcessError> {
    let size = std::fs::metadata(path)?.len();
    Ok(formats::validate_input(path, size, max_file_size, declared)?)
}

/// Process a single input file and write its output.
pub fn process_file(
    codec: &impl ImageCodec,
    path: &Path,
    options: &BatchOptions,
) -> Result<ImageSummary, ProcessError> {
    let media_type = screen_input(path, options.max_file_size, options.media_type)?;
    let bytes = std::fs::read(path)?;
    let mut decoded = codec.decode(&bytes, media_type)?;
    if let Some(region) = options.crop {
        decoded.buffer = crop(&decoded.buffer, region)?;
    }

    let result = process_decoded(codec, decoded, &options.params)?;
    let output = options.output_path(path);
    std::fs::write(&output, &result.encoded)?;

    Ok(ImageSummary {
        name: display_name(path),
        source: path.to_path_buf(),
        output,
        media_type,
        original_size: result.original_size,
        processed_size: result.processed_size,
        width: result.width,
        height: result.height,
    })
}

/// For each input, the earlier input that already owns its output path.
fn output_claims<'a>(inputs: &'a [PathBuf], options: &BatchOptions) -> Vec<Option<&'a PathBuf>> {
    let mut owners: HashMap<PathBuf, &PathBuf> = HashMap::new();
    inputs
        .iter()
        .map(|input| match owners.entry(options.output_path(input)) {
            Entry::Occupied(owner) => Some(*owner.get()),
            Entry::Vacant(slot) => {
                slot.insert(input);
                None
            }
        })
        .collect()
}

/// Process `inputs` on a pool of `options.threads` workers.
///
/// Fails only if the output directory or the pool cannot be set up; every
/// per-image failure lands in the report.
pub fn run_batch(
    codec: &impl ImageCodec,
    inputs: &[PathBuf],
    options: &BatchOptions,
    cancel: &CancelToken,
    progress: Option<Sender<BatchEvent>>,
) -> Result<BatchReport, BatchError> {
    std::fs::create_dir_all(&options.output_dir)?;
    let threads = options.threads.max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("batchpix-worker-{i}"))
        .build()?;

    let claims = output_claims(inputs, options);

    info!(total = inputs.len(), threads, "Starting batch");
    let send = |event: BatchEvent| {
        if let Some(tx) = &progress {
            tx.send(event).ok();
        }
    };
    send(BatchEvent::Started {
        total: inputs.len(),
    });

    let results: Vec<Result<ImageSummary, ProcessError>> = pool.install(|| {
        inputs
            .par_iter()
            .enumerate()
            .map(|(index, path)| {
                if cancel.is_cancelled() {
                    debug!(index, path = %path.display(), "Skipping cancelled task");
                    return Err(ProcessError::Cancelled);
                }
                let result = match claims[index] {
                    Some(first) => Err(ProcessError::OutputConflict {
                        output: options.output_path(path),
                        first: first.clone(),
                    }),
                    None => process_file(codec, path, options),
                };
                match &result {
                    Ok(summary) => {
                        debug!(index, output = %summary.output.display(), "Processed");
                        send(BatchEvent::ImageProcessed {
                            index,
                            summary: summary.clone(),
                        });
                    }
                    Err(e) => {
                        warn!(index, path = %path.display(), error = %e, "Image failed");
                        send(BatchEvent::ImageFailed {
                            index,
                            name: display_name(path),
                            error: e.to_string(),
                        });
                    }
                }
                result
            })
            .collect()
    });

    let report = BatchReport {
        inputs: inputs.to_vec(),
        results,
    };
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        cancelled = report.cancelled(),
        "Batch finished"
    );
    send(BatchEvent::Finished {
        succeeded: report.succeeded(),
        failed: report.failed(),
        cancelled: report.cancelled(),
    });
    Ok(report)
}

/// Expand directories into the image files they contain.
///
/// Files named explicitly are kept as-is, even with an unknown extension,
/// so they are reported rather than silently dropped. Directory contents
/// are filtered to known extensions and sorted by name. Subdirectories are
/// descended only when `recursive` is set.
pub fn expand_inputs(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }
        let walker = WalkDir::new(input)
            .min_depth(1)
            .max_depth(if recursive { usize::MAX } else { 1 })
            .sort_by_file_name();
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && MediaType::from_path(entry.path()).is_some() {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}
