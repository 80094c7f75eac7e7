//! # CLI Module
//!
//! Command-line interface for the frame deduplicator.
//!
//! ## Usage
//! ```bash
//! # Remove duplicates in place
//! frame-dedup /data/camera-7
//!
//! # See what would go, without deleting
//! frame-dedup /data/camera-7 --dry-run
//!
//! # Stricter matching with a light blur against sensor noise
//! frame-dedup /data/camera-7 --change-ratio 0.05 --blur 5
//!
//! # Camera with a timestamp along the bottom edge
//! frame-dedup /data/camera-7 --mask 5 0 5 8
//!
//! # JSON output
//! frame-dedup /data/camera-7 --dry-run --output json
//! ```

use clap::{Parser, ValueEnum};
use console::{style, Term};
use frame_dedup::core::change::BorderMask;
use frame_dedup::core::comparator::CHANGE_RATIO;
use frame_dedup::core::pipeline::{Pipeline, PipelineResult};
use frame_dedup::error::Result;
use frame_dedup::events::{CompareEvent, Event, EventChannel, LoadEvent, PipelineEvent, ScanEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::thread;

/// Frame Dedup - remove near-duplicate camera stills, keeping the larger copy
#[derive(Parser, Debug)]
#[command(name = "frame-dedup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory with the images
    directory: PathBuf,

    /// Largest changed share of the frame that still counts as a duplicate
    #[arg(long, default_value_t = CHANGE_RATIO)]
    change_ratio: f64,

    /// Gaussian blur kernel sizes applied before comparing (odd numbers)
    #[arg(long, num_args = 1..)]
    blur: Vec<u32>,

    /// Border strips to blank before comparing, in percent: LEFT TOP RIGHT BOTTOM
    #[arg(long, num_args = 4, value_names = ["LEFT", "TOP", "RIGHT", "BOTTOM"], conflicts_with = "no_mask")]
    mask: Option<Vec<f64>>,

    /// Compare whole frames, camera overlays included
    #[arg(long)]
    no_mask: bool,

    /// List duplicates without deleting them
    #[arg(long)]
    dry_run: bool,

    /// Leave hidden files (names starting with '.') out of the listing
    #[arg(long)]
    skip_hidden: bool,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Log lines plus removed paths, one per line
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match (cli.verbose, cli.output) {
        (true, _) => "debug",
        (false, OutputFormat::Minimal) => "info",
        (false, _) => "warn",
    };
    frame_dedup::init_tracing(default_level);

    let term = Term::stderr();

    if matches!(cli.output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Frame Dedup").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let mut builder = Pipeline::builder()
        .directory(cli.directory.clone())
        .change_ratio(cli.change_ratio)
        .blur_kernels(cli.blur.clone())
        .include_hidden(!cli.skip_hidden)
        .dry_run(cli.dry_run);

    if cli.no_mask {
        builder = builder.no_mask();
    } else if let Some([left, top, right, bottom]) = cli.mask.as_deref() {
        builder = builder.mask(BorderMask {
            left: *left,
            top: *top,
            right: *right,
            bottom: *bottom,
        });
    }

    let pipeline = builder.build();

    let (sender, receiver) = EventChannel::new();

    let progress = if matches!(cli.output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose = cli.verbose;

    let event_thread = thread::spawn(move || {
        let Some(pb) = progress_clone else {
            // Drain so the channel never backs up
            for _ in receiver.iter() {}
            return;
        };

        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{}", phase));
                }
                Event::Scan(ScanEvent::Completed { total_files }) => {
                    pb.set_length(total_files as u64);
                }
                Event::Load(LoadEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                }
                Event::Compare(CompareEvent::Started { total_frames }) => {
                    pb.set_length(total_frames as u64);
                    pb.set_position(0);
                }
                Event::Compare(CompareEvent::AnchorStarted { path, .. }) if verbose => {
                    pb.set_message(format!("Comparing {}", file_name(&path)));
                }
                Event::Compare(CompareEvent::Progress(p)) => {
                    pb.set_position(p.anchors_completed as u64);
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Error { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let result = result?;

    match cli.output {
        OutputFormat::Pretty => print_pretty_results(&term, &result, cli.verbose),
        OutputFormat::Json => print_json_results(&result),
        OutputFormat::Minimal => print_minimal_results(&result),
    }

    Ok(())
}

fn print_pretty_results(term: &Term, result: &PipelineResult, verbose: bool) {
    term.write_line(&format!("{} Done", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} images checked in {:.1}s ({} comparisons)",
        style(result.valid_frames).cyan(),
        result.duration_ms as f64 / 1000.0,
        result.comparisons
    ))
    .ok();

    if !result.skipped.is_empty() {
        term.write_line(&format!(
            "  {} files skipped (not readable as images)",
            style(result.skipped.len()).dim()
        ))
        .ok();
    }

    term.write_line(&format!(
        "  {} duplicates found",
        style(result.matches.len()).cyan()
    ))
    .ok();

    if result.dry_run {
        term.write_line(&format!(
            "  {} nothing deleted (dry run)",
            style("○").dim()
        ))
        .ok();
    } else {
        term.write_line(&format!(
            "  {} files deleted",
            style(result.deletion.deleted_count()).yellow()
        ))
        .ok();
    }

    if result.duplicate_bytes > 0 {
        term.write_line(&format!(
            "  {} {}",
            style(format_bytes(result.duplicate_bytes)).green(),
            if result.dry_run { "could be freed" } else { "freed" }
        ))
        .ok();
    }

    for error in &result.errors {
        term.write_line(&format!("  {} {}", style("!").red(), error))
            .ok();
    }

    if result.matches.is_empty() {
        return;
    }

    term.write_line("").ok();
    term.write_line(&format!("{}", style("Duplicates:").bold().underlined()))
        .ok();

    for m in &result.matches {
        term.write_line(&format!(
            "  {} {}",
            style("✗").red(),
            display_path(&m.removed)
        ))
        .ok();
        term.write_line(&format!(
            "    {} {}",
            style("kept").dim(),
            display_path(&m.kept)
        ))
        .ok();

        if verbose {
            term.write_line(&format!(
                "    {}",
                style(format!(
                    "changed {:.2}% of frame (score {:.0}, limit {:.0})",
                    m.changed_fraction * 100.0,
                    m.score,
                    m.threshold
                ))
                .dim()
            ))
            .ok();
        }
    }
}

fn print_json_results(result: &PipelineResult) {
    let output = serde_json::json!({
        "total_files": result.total_files,
        "valid_frames": result.valid_frames,
        "skipped": result.skipped,
        "comparisons": result.comparisons,
        "duplicate_count": result.matches.len(),
        "deleted_count": result.deletion.deleted_count(),
        "duplicate_bytes": result.duplicate_bytes,
        "dry_run": result.dry_run,
        "duration_ms": result.duration_ms,
        "errors": result.errors,
        "duplicates": result.matches,
    });

    println!("{:#}", output);
}

fn print_minimal_results(result: &PipelineResult) {
    for m in &result.matches {
        println!("{}", m.removed.display());
    }
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn display_path(path: &Path) -> String {
    match dirs::home_dir().and_then(|home| path.strip_prefix(home).ok().map(Path::to_path_buf)) {
        Some(relative) => format!("~/{}", relative.display()),
        None => path.display().to_string(),
    }
}
