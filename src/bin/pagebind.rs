//! CLI binary for pagebind.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, runs the batch, and prints a summary.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pagebind::{convert, ConversionConfig, ConversionReport};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # One PDF per image-bearing folder under scans/
  pagebind scans/

  # Convert a ZIP without extracting it
  pagebind photos.zip

  # Several inputs, custom output directory
  pagebind scans/ photos.zip more/ -o ~/pdfs

  # Delete sources after a confirmed write, prune emptied folders
  pagebind scans/ --delete-source

  # Smaller output at the cost of quality
  pagebind scans/ --jpeg-quality 70

  # Machine-readable report
  pagebind scans/ --json > report.json

GROUPING:
  Every directory that directly contains images becomes one PDF, named
  after the directory ("scans.pdf" for the input root, "sub.pdf" for
  scans/sub/). Inside a ZIP the same rule applies to entry directories:
  photos.zip with a.png and album/b.png yields photos.pdf and
  photos_album.pdf. Name collisions get a " (1)" suffix.

ACCEPTED IMAGE FORMATS:
  .png .jpg .jpeg .gif .bmp (case-insensitive)

ENVIRONMENT VARIABLES:
  PAGEBIND_OUTPUT_DIR     Default output directory
  PAGEBIND_JPEG_QUALITY   Default JPEG re-encode quality (1-100)
  RUST_LOG                Override the tracing filter
"#;

/// Batch-convert folders and ZIP archives of images into PDFs.
#[derive(Parser, Debug)]
#[command(
    name = "pagebind",
    version,
    about = "Batch-convert folders and ZIP archives of images into per-folder PDFs",
    long_about = "Batch-convert collections of images into PDF documents, one PDF per \
directory that directly contains images. Accepts loose directory trees and ZIP \
archives; ZIP entries are read in place, never extracted to disk.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input paths: directories and/or .zip archives.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory where output PDFs are written (created if absent).
    #[arg(short, long, env = "PAGEBIND_OUTPUT_DIR", default_value = "pdf_output")]
    output_dir: PathBuf,

    /// Delete source images, emptied directories, and fully converted
    /// archives after each PDF is confirmed written.
    #[arg(long)]
    delete_source: bool,

    /// JPEG re-encode quality (1-100).
    #[arg(long, env = "PAGEBIND_JPEG_QUALITY", default_value_t = 90,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,

    /// Output the report as JSON instead of a human-readable summary.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar and the summary cover what the user needs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = ConversionConfig::builder()
        .output_dir(&cli.output_dir)
        .delete_source(cli.delete_source)
        .jpeg_quality(cli.jpeg_quality)
        .build()
        .context("Invalid configuration")?;

    // ── Run conversion ───────────────────────────────────────────────────
    let bar = if show_progress {
        let bar = ProgressBar::new(cli.inputs.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos}/{len} inputs  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let mut merged = ConversionReport::default();
    for input in &cli.inputs {
        if let Some(ref bar) = bar {
            bar.set_message(input.display().to_string());
        }
        let report = convert(input, &config)
            .with_context(|| format!("Conversion failed for {}", input.display()))?;

        if let Some(ref bar) = bar {
            let mark = if report.is_clean() { green("✓") } else { cyan("⚠") };
            bar.println(format!(
                "  {} {}  {}",
                mark,
                input.display(),
                dim(&format!(
                    "{} PDF(s), {} error(s)",
                    report.pdfs_created,
                    report.errors.len()
                )),
            ));
            bar.inc(1);
        }
        merged.merge(report);
    }
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    // ── Report ───────────────────────────────────────────────────────────
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&merged).context("Failed to serialise report")?
        );
        return Ok(());
    }

    if !cli.quiet {
        for path in &merged.written {
            eprintln!("  {} {}", green("→"), path.display());
        }
        if merged.errors.is_empty() {
            eprintln!(
                "{} {} PDF(s) created in {}",
                green("✔"),
                bold(&merged.pdfs_created.to_string()),
                bold(&cli.output_dir.display().to_string()),
            );
        } else {
            eprintln!(
                "{} {} PDF(s) created, {} item(s) skipped:",
                if merged.pdfs_created == 0 { red("✘") } else { cyan("⚠") },
                bold(&merged.pdfs_created.to_string()),
                red(&merged.errors.len().to_string()),
            );
            for err in &merged.errors {
                eprintln!("    {} {}", red("✗"), err);
            }
        }
    }

    Ok(())
}
