//! # CLI Module
//!
//! Command-line interface for the leaf transformation pipeline.
//!
//! ## Usage
//! ```bash
//! # One image: write a montage of every variant
//! leaf-pipeline single --path leaf1.jpg
//!
//! # One image, only the final requested variant
//! leaf-pipeline single --path leaf1.jpg --ops crop_blur --show one
//!
//! # Whole dataset: persist variants under dst/<class>/<variant>/
//! leaf-pipeline multi --src images/ --dst out/ --ops crop_blur --workers 4
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use leaf_pipeline::core::discover::discover_images;
use leaf_pipeline::core::montage::compose_grid;
use leaf_pipeline::core::variants::variant_for_request;
use leaf_pipeline::core::{
    resolve, BatchReport, ImageExecutor, OpConfig, OpRegistry, PoolConfig, SaveMode,
    VariantWriter,
};
use leaf_pipeline::error::{LeafPipelineError, Result};
use leaf_pipeline::events::{BatchEvent, Event, EventChannel};
use std::path::PathBuf;
use std::thread;

/// Default operation list: the full chain up to the blurred crop.
const DEFAULT_OPS: &str =
    "gaussian_blur,rgb2lab,otsu,fill_holes,analyse,select_mask,remove_background,crop,crop_blur";

/// Leaf Pipeline - derive classifier-ready leaf image variants
#[derive(Parser, Debug)]
#[command(name = "leaf-pipeline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transform a single image and write a variant montage
    Single {
        /// Path to an image
        #[arg(long)]
        path: PathBuf,

        /// Comma-separated list of operations/aliases
        #[arg(long)]
        ops: Option<String>,

        /// Show every variant or only the final requested one
        #[arg(long, default_value = "all")]
        show: Mode,

        /// Directory the montage is written to
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Transform every image under a source tree
    Multi {
        /// Source directory (class folders with images)
        #[arg(long)]
        src: PathBuf,

        /// Destination directory for variants
        #[arg(long)]
        dst: PathBuf,

        /// Comma-separated list of operations/aliases
        #[arg(long)]
        ops: Option<String>,

        /// Save every variant or only the final requested one
        #[arg(long, default_value = "all")]
        save: Mode,

        /// Worker thread count (default: cores - 2, at least 1)
        #[arg(long)]
        workers: Option<usize>,

        /// Output format for the summary
        #[arg(long, default_value = "pretty")]
        output: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Every variant
    All,
    /// Only the final requested variant
    One,
}

impl From<Mode> for SaveMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::All => SaveMode::All,
            Mode::One => SaveMode::FinalOnly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

fn parse_ops(ops: Option<String>) -> Vec<String> {
    ops.unwrap_or_else(|| DEFAULT_OPS.to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Run the CLI
pub fn run() -> Result<()> {
    leaf_pipeline::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Single {
            path,
            ops,
            show,
            out,
        } => run_single(path, parse_ops(ops), show, out),
        Commands::Multi {
            src,
            dst,
            ops,
            save,
            workers,
            output,
        } => run_multi(src, dst, parse_ops(ops), save, workers, output),
    }
}

fn run_single(path: PathBuf, ops: Vec<String>, show: Mode, out: PathBuf) -> Result<()> {
    let term = Term::stderr();

    if !path.exists() {
        return Err(LeafPipelineError::Config(format!(
            "image path {} does not exist",
            path.display()
        )));
    }

    // Validate the requested ops before touching the image.
    let registry = OpRegistry::standard();
    let plan = resolve(&ops, &registry)?;

    let executor = ImageExecutor::new(plan, &registry, &OpConfig::default(), None)?;
    let variants = executor.process(&path)?;

    std::fs::create_dir_all(&out).map_err(|e| LeafPipelineError::Config(e.to_string()))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    let written = match show {
        Mode::All => {
            let grid = compose_grid(&variants, variants.len().max(1)).ok_or_else(|| {
                LeafPipelineError::Config("no variants to display".to_string())
            })?;
            let target = out.join(format!("{stem}_variants.png"));
            grid.save(&target)
                .map_err(|e| LeafPipelineError::Config(e.to_string()))?;
            target
        }
        Mode::One => {
            let name = ops
                .last()
                .and_then(|op| variant_for_request(op))
                .unwrap_or("original");
            let variant = variants
                .get(name)
                .ok_or_else(|| {
                    LeafPipelineError::Config(format!("variant '{name}' was not produced"))
                })?;
            let target = out.join(format!("{stem}_{name}.png"));
            variant
                .save(&target)
                .map_err(|e| LeafPipelineError::Config(e.to_string()))?;
            target
        }
    };

    term.write_line(&format!(
        "{} {} variant(s): {}",
        style("✓").green().bold(),
        style(variants.len()).cyan(),
        variants.names().join(", ")
    ))
    .ok();
    term.write_line(&format!("  written to {}", style(written.display()).cyan()))
        .ok();

    Ok(())
}

fn run_multi(
    src: PathBuf,
    dst: PathBuf,
    ops: Vec<String>,
    save: Mode,
    workers: Option<usize>,
    output: OutputFormat,
) -> Result<()> {
    let term = Term::stderr();

    // Fatal validation happens before any worker is spawned.
    let registry = OpRegistry::standard();
    resolve(&ops, &registry)?;

    let paths = discover_images(&src)?;
    if paths.is_empty() {
        term.write_line("No images found under the source directory.")
            .ok();
        return Ok(());
    }

    std::fs::create_dir_all(&dst).map_err(|e| LeafPipelineError::Config(e.to_string()))?;
    let writer = VariantWriter::new(&dst, save.into());

    let pool = workers
        .map(PoolConfig::with_workers)
        .unwrap_or_default();

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Leaf Pipeline").bold().cyan(),
            style(format!("({} workers)", pool.workers)).dim()
        ))
        .ok();
    }

    // Progress bar driven by pipeline events on a separate thread.
    let (sender, receiver) = EventChannel::new();
    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(paths.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Batch(BatchEvent::Started { total_images }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_length(total_images as u64);
                    }
                }
                Event::Batch(BatchEvent::ImageCompleted { path }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.inc(1);
                        pb.set_message(
                            path.file_name()
                                .unwrap_or_default()
                                .to_string_lossy()
                                .into_owned(),
                        );
                    }
                }
                Event::Batch(BatchEvent::ImageFailed { .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.inc(1);
                    }
                }
                Event::Batch(BatchEvent::Completed { .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.finish_and_clear();
                    }
                }
            }
        }
    });

    let report = leaf_pipeline::core::pool::process_batch(
        &paths,
        &ops,
        &OpConfig::default(),
        &pool,
        Some(writer),
        &sender,
    )?;

    // Drop sender to signal the event thread to finish
    drop(sender);
    event_thread.join().ok();

    match output {
        OutputFormat::Pretty => print_pretty_report(&term, &report),
        OutputFormat::Json => print_json_report(&report),
    }

    Ok(())
}

fn print_pretty_report(term: &Term, report: &BatchReport) {
    term.write_line("").ok();
    term.write_line(&format!("{} Batch Complete", style("✓").green().bold()))
        .ok();
    term.write_line(&format!(
        "  {} images processed in {:.1}s",
        style(report.processed).cyan(),
        report.duration_ms as f64 / 1000.0
    ))
    .ok();

    if !report.failed.is_empty() {
        term.write_line(&format!(
            "  {} failed:",
            style(report.failed.len()).red().bold()
        ))
        .ok();
        for (path, message) in &report.failed {
            term.write_line(&format!("    {} {}", style("✗").red(), path.display()))
                .ok();
            term.write_line(&format!("      {}", style(message).dim())).ok();
        }
    }
}

fn print_json_report(report: &BatchReport) {
    let output = serde_json::json!({
        "total": report.total,
        "processed": report.processed,
        "failed": report.failed.iter().map(|(path, message)| {
            serde_json::json!({ "path": path, "message": message })
        }).collect::<Vec<_>>(),
        "duration_ms": report.duration_ms,
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&output).unwrap_or_default()
    );
}
