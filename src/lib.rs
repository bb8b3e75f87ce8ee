//! # pagebind
//!
//! Batch-convert folders and ZIP archives of images into per-folder PDF
//! documents.
//!
//! ## Why this crate?
//!
//! Scanned books, photo dumps, and comic archives arrive as directory
//! trees or ZIP files full of loose images. pagebind turns every
//! directory that directly contains images — physical on disk or virtual
//! inside a ZIP — into one PDF, with a page per image. ZIP entries are
//! streamed straight out of the archive, never extracted to disk.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input (dir or .zip)
//!  │
//!  ├─ 1. Discover  partition images into per-directory groups
//!  ├─ 2. Decode    any accepted format → normalised RGB JPEG
//!  ├─ 3. Layout    A4 page, orientation per image, centred with margin
//!  ├─ 4. Assemble  JPEG embedded verbatim (DCTDecode), one page each
//!  ├─ 5. Name      collision-free `{base}.pdf` / `{base} (n).pdf`
//!  └─ 6. Cleanup   optional: delete consumed sources, prune empty dirs
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pagebind::{convert, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .output_dir("pdf_output")
//!         .build()?;
//!     let report = convert("scans/", &config)?;
//!     println!("created {} PDFs", report.pdfs_created);
//!     for err in &report.errors {
//!         eprintln!("skipped: {err}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pagebind` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pagebind = { version = "0.3", default-features = false }
//! ```
//!
//! ## Failure model
//!
//! Per-image, per-archive, and per-document failures never abort a run;
//! they are collected in [`ConversionReport::errors`]. The only fatal
//! error is an output directory that cannot be created.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod pipeline;
pub mod report;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_JPEG_QUALITY, DEFAULT_OUTPUT_DIR};
pub use convert::{convert, convert_all};
pub use error::{ConvertError, ItemError, ItemErrorKind};
pub use report::ConversionReport;
