//! Conversion configuration with a validating builder.
//!
//! ## Why a builder?
//! Every knob has a sensible default, so the common path is
//! `ConversionConfig::default()`. The builder exists for callers that need
//! to tune output location, cleanup behaviour, or JPEG quality without
//! positional-argument soup, and `build()` is the single place where
//! cross-field validation happens.

use crate::error::ConvertError;
use std::path::{Path, PathBuf};

/// Default directory (relative to the current working directory) where
/// output PDFs are written.
pub const DEFAULT_OUTPUT_DIR: &str = "pdf_output";

/// Default JPEG re-encode quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Settings for a conversion run.
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Directory where output PDFs land. Created on demand.
    pub output_dir: PathBuf,
    /// Delete source images (and the directories or archives left empty)
    /// after their bytes were embedded into a successfully written PDF.
    pub delete_source: bool,
    /// JPEG re-encode quality, 1–100.
    pub jpeg_quality: u8,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            delete_source: false,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ConversionConfig {
    /// Start building a configuration.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug, Default, Clone)]
pub struct ConversionConfigBuilder {
    output_dir: Option<PathBuf>,
    delete_source: bool,
    jpeg_quality: Option<u8>,
}

impl ConversionConfigBuilder {
    /// Where output PDFs are written (default: `pdf_output`).
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Remove source images, emptied directories, and fully converted
    /// archives after a confirmed write (default: off).
    pub fn delete_source(mut self, yes: bool) -> Self {
        self.delete_source = yes;
        self
    }

    /// JPEG re-encode quality, 1–100 (default: 90).
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality);
        self
    }

    /// Validate and produce the configuration.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        let jpeg_quality = self.jpeg_quality.unwrap_or(DEFAULT_JPEG_QUALITY);
        if !(1..=100).contains(&jpeg_quality) {
            return Err(ConvertError::InvalidConfig(format!(
                "jpeg_quality must be between 1 and 100, got {jpeg_quality}"
            )));
        }

        let output_dir = self
            .output_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        if output_dir.as_os_str().is_empty() {
            return Err(ConvertError::InvalidConfig(
                "output_dir must not be empty".into(),
            ));
        }

        Ok(ConversionConfig {
            output_dir,
            delete_source: self.delete_source,
            jpeg_quality,
        })
    }
}
