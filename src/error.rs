//! Error types for the pagebind library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ConvertError`] — **Fatal**: the run cannot proceed at all (the
//!   output directory cannot be created, or the configuration is invalid).
//!   Returned as `Err(ConvertError)` from the top-level `convert*`
//!   functions before any input is touched.
//!
//! * [`ItemError`] — **Non-fatal**: a single image, archive, or output
//!   document failed but every sibling is unaffected. Collected inside
//!   [`crate::report::ConversionReport`] so callers can inspect partial
//!   success rather than losing a whole batch to one corrupt file.
//!
//! The split preserves the engine's core contract: nothing below the
//! whole-run level ever aborts processing of sibling groups or inputs.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// All fatal errors returned by the pagebind library.
///
/// Per-image and per-archive failures use [`ItemError`] and are stored in
/// [`crate::report::ConversionReport`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The output directory could not be created. Nothing was processed.
    #[error("Cannot create output directory '{path}': {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal error recorded for one path (image file, ZIP entry,
/// archive, or output document).
///
/// `path` is a display string rather than a `PathBuf` because ZIP entry
/// names are not filesystem paths; for entries it takes the form
/// `archive.zip!inner/name`.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
#[error("{path}: {kind}")]
pub struct ItemError {
    /// The file, entry, or document the error applies to.
    pub path: String,
    /// What went wrong.
    pub kind: ItemErrorKind,
}

impl ItemError {
    pub(crate) fn new(path: impl AsRef<Path>, kind: ItemErrorKind) -> Self {
        Self {
            path: path.as_ref().display().to_string(),
            kind,
        }
    }

    /// Record an error against a ZIP entry, qualified by its archive.
    pub(crate) fn for_entry(archive: &Path, entry: &str, kind: ItemErrorKind) -> Self {
        Self {
            path: format!("{}!{}", archive.display(), entry),
            kind,
        }
    }
}

/// Classification of a non-fatal failure.
///
/// The variants mirror the recovery policy: `Decode` skips one image,
/// `Archive` skips one ZIP, `Write` skips one output document, `Walk`
/// skips one directory entry, `InvalidInput` skips one user-supplied
/// input. None of them stops the run.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum ItemErrorKind {
    /// The image bytes could not be decoded; the page is skipped.
    #[error("image decode failed: {0}")]
    Decode(String),

    /// The ZIP archive could not be opened or read; it contributes no groups.
    #[error("archive unreadable: {0}")]
    Archive(String),

    /// The assembled PDF could not be serialised or written.
    #[error("PDF write failed: {0}")]
    Write(String),

    /// A directory entry could not be visited during discovery.
    #[error("directory walk error: {0}")]
    Walk(String),

    /// The input path is neither a directory nor a `.zip` file.
    #[error("not a directory or .zip archive")]
    InvalidInput,
}
