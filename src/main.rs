use batchpix::batch::{self, BatchOptions, CancelToken};
use batchpix::config::{self, BatchConfig, ProcessingConfig};
use batchpix::formats::MediaType;
use batchpix::imaging::{CropRegion, RustCodec};
use batchpix::output;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("BATCHPIX_RELEASE");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("BATCHPIX_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "batchpix")]
#[command(about = "Batch image resizer with automatic enhancement")]
#[command(long_about = "\
Batch image resizer with automatic enhancement

Every input is scaled so its longest edge fits --max-dimension (never
upscaled), optionally enhanced, and written as JPEG:

  decode → [crop] → resize → [color correction → texture → sharpen] → encode

Accepted inputs: JPEG (jpg, jpeg, jfif), PNG, BMP, WebP, TIFF.
HEIC/HEIF and SVG are recognised but need external conversion.
Files over 50 MiB are rejected (see [limits] in the config).

Use --type to declare the media type of inputs whose extension is missing
or wrong.

Outputs are named processed_<stem>.jpg in the output directory. When two
inputs map to the same output name, the later one fails.

Settings come from batchpix.toml in the working directory (or --config);
flags override the file. Run 'batchpix gen-config' for a documented file.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (default: ./batchpix.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log pipeline details to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct InputArgs {
    /// Image files or directories
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Treat every input as this MIME type instead of guessing from the extension
    #[arg(long = "type", value_name = "MIME")]
    media_type: Option<MediaType>,
}

#[derive(Args)]
struct ProcessArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// JPEG quality, greater than 0 and at most 1
    #[arg(short, long)]
    quality: Option<f32>,

    /// Longest edge in pixels
    #[arg(short, long)]
    max_dimension: Option<u32>,

    /// Apply color correction, texture and sharpen passes
    #[arg(short, long)]
    enhance: bool,

    /// Parallel workers (capped at the number of CPU cores)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Crop every image to x,y,width,height before resizing
    #[arg(long, value_name = "X,Y,W,H")]
    crop: Option<CropRegion>,

    /// Write a JSON report of every input to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Resize, optionally enhance, and re-encode images
    Process(ProcessArgs),
    /// Validate inputs (type and size) without processing
    Check(InputArgs),
    /// Print a stock batchpix.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Process(args) => {
            let config = apply_overrides(load_config(cli.config.as_deref())?, &args);
            config.validate()?;
            let inputs = batch::expand_inputs(&args.input.inputs, args.input.recursive)?;
            if inputs.is_empty() {
                return Err("No input images found".into());
            }

            let options = BatchOptions {
                params: config.parameters()?,
                threads: config::effective_threads(&config.processing),
                output_dir: args.output.clone(),
                prefix: config.output.prefix.clone(),
                max_file_size: config.limits.max_file_size,
                crop: args.crop,
                media_type: args.input.media_type,
            };

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_batch_event(&event);
                }
            });
            let report = batch::run_batch(
                &RustCodec::new(),
                &inputs,
                &options,
                &CancelToken::new(),
                Some(tx),
            )?;
            printer.join().map_err(|_| "output thread panicked")?;

            if let Some(path) = &args.report {
                std::fs::write(path, report.to_json()?)?;
            }
            if report.failed() > 0 {
                return Err(format!("{} of {} images failed", report.failed(), inputs.len()).into());
            }
        }
        Command::Check(args) => {
            let config = load_config(cli.config.as_deref())?;
            let inputs = batch::expand_inputs(&args.inputs, args.recursive)?;
            let results: Vec<_> = inputs
                .into_iter()
                .map(|path| {
                    let result = batch::screen_input(
                        &path,
                        config.limits.max_file_size,
                        args.media_type,
                    );
                    (path, result)
                })
                .collect();
            output::print_check_output(&results);
            let invalid = results.iter().filter(|(_, r)| r.is_err()).count();
            if invalid > 0 {
                return Err(format!("{} of {} inputs are invalid", invalid, results.len()).into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<BatchConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}

/// Command-line flags override the config file.
fn apply_overrides(mut config: BatchConfig, args: &ProcessArgs) -> BatchConfig {
    if let Some(quality) = args.quality {
        config.output.quality = quality;
    }
    if let Some(max_dimension) = args.max_dimension {
        config.output.max_dimension = max_dimension;
    }
    if args.enhance {
        config.output.enhance = true;
    }
    if let Some(threads) = args.threads {
        config.processing = ProcessingConfig {
            max_processes: Some(threads),
        };
    }
    config
}
