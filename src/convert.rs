//! Top-level conversion orchestrator.
//!
//! [`convert`] drives one input (a directory or a `.zip` file) through
//! discovery, per-group decode/layout/assembly, output naming, and the
//! optional cleanup pass. [`convert_all`] runs a batch and merges the
//! reports.
//!
//! The recovery contract from [`crate::error`] is enforced here: a corrupt
//! image skips one page, an unreadable archive skips its groups, a failed
//! write skips one document. Only a missing output directory aborts the
//! run, and it does so before any input is touched.
//!
//! ## Cleanup rules (only when `delete_source` is set)
//! * Loose images are deleted right after their PDF is confirmed written;
//!   files that failed to decode survive.
//! * A ZIP archive is deleted only when every accepted image entry in it
//!   was embedded into a successfully written PDF.
//! * For directory inputs a final bottom-up pass attempts `remove_dir` on
//!   every directory including the input root; non-empty directories fail
//!   silently and survive.

use crate::config::ConversionConfig;
use crate::error::{ConvertError, ItemError, ItemErrorKind};
use crate::pipeline::assemble::PdfDocumentBuilder;
use crate::pipeline::codec::{self, DecodedImage};
use crate::pipeline::discover::{self, GroupSource, ImageGroup};
use crate::pipeline::layout::layout_a4;
use crate::pipeline::naming;
use crate::report::ConversionReport;
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::ZipArchive;

/// Convert one input path (directory or `.zip` file) to PDFs.
///
/// Returns a report with the written paths and every non-fatal error.
/// Fails only when the output directory cannot be created.
pub fn convert(input: impl AsRef<Path>, config: &ConversionConfig) -> Result<ConversionReport, ConvertError> {
    let input = input.as_ref();
    ensure_output_dir(config)?;

    let mut report = ConversionReport::default();
    if is_zip_file(input) {
        convert_zip_input(input, config, &mut report);
    } else if input.is_dir() {
        convert_dir_input(input, config, &mut report);
    } else {
        warn!(input = %input.display(), "input is neither a directory nor a .zip file");
        report
            .errors
            .push(ItemError::new(input, ItemErrorKind::InvalidInput));
    }
    Ok(report)
}

/// Convert a batch of inputs, merging all reports into one.
///
/// A failed input never stops the batch; the merged report carries its
/// errors alongside the other inputs' results.
pub fn convert_all<I, P>(inputs: I, config: &ConversionConfig) -> Result<ConversionReport, ConvertError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    ensure_output_dir(config)?;
    let mut merged = ConversionReport::default();
    for input in inputs {
        merged.merge(convert(input, config)?);
    }
    info!(
        pdfs = merged.pdfs_created,
        errors = merged.errors.len(),
        "batch finished"
    );
    Ok(merged)
}

fn ensure_output_dir(config: &ConversionConfig) -> Result<(), ConvertError> {
    fs::create_dir_all(&config.output_dir).map_err(|source| ConvertError::OutputDir {
        path: config.output_dir.clone(),
        source,
    })
}

fn is_zip_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
}

fn convert_zip_input(archive: &Path, config: &ConversionConfig, report: &mut ConversionReport) {
    info!(input = %archive.display(), "converting archive");
    let groups = discover::discover_zip(archive, &mut report.errors);
    let mut tally = ArchiveTally::default();
    for group in &groups {
        let result = convert_group(group, config, report);
        tally.add(group, &result);
    }
    if config.delete_source {
        tally.delete_fully_embedded();
    }
}

fn convert_dir_input(root: &Path, config: &ConversionConfig, report: &mut ConversionReport) {
    info!(input = %root.display(), "converting directory");
    let groups = discover::discover_dir(root, &mut report.errors);
    let mut tally = ArchiveTally::default();
    for group in &groups {
        let result = convert_group(group, config, report);
        tally.add(group, &result);
        if config.delete_source {
            for file in &result.embedded_files {
                // Best-effort: a file that cannot be removed just survives.
                let _ = fs::remove_file(file);
            }
        }
    }
    if config.delete_source {
        tally.delete_fully_embedded();
        prune_empty_dirs(root);
    }
}

/// Attempt `remove_dir` on every directory under `root`, children before
/// parents, the root last. Non-empty directories are left alone.
fn prune_empty_dirs(root: &Path) {
    for entry in WalkDir::new(root).contents_first(true).into_iter().flatten() {
        if entry.file_type().is_dir() {
            let _ = fs::remove_dir(entry.path());
        }
    }
}

/// What one group contributed, for cleanup bookkeeping. The embedded
/// lists stay empty unless the output PDF was confirmed written.
#[derive(Debug, Default)]
struct GroupResult {
    embedded_files: Vec<PathBuf>,
    embedded_entries: usize,
}

/// Per-archive counts of accepted vs. embedded entries. An archive may
/// contribute several groups; it is deleted only when every accepted
/// entry across all of them was embedded.
#[derive(Debug, Default)]
struct ArchiveTally {
    counts: BTreeMap<PathBuf, (usize, usize)>,
}

impl ArchiveTally {
    fn add(&mut self, group: &ImageGroup, result: &GroupResult) {
        if let GroupSource::Archive { archive, entries } = &group.source {
            let (total, embedded) = self.counts.entry(archive.clone()).or_default();
            *total += entries.len();
            *embedded += result.embedded_entries;
        }
    }

    fn delete_fully_embedded(&self) {
        for (archive, &(total, embedded)) in &self.counts {
            if embedded == total {
                debug!(archive = %archive.display(), "all entries embedded, removing archive");
                let _ = fs::remove_file(archive);
            }
        }
    }
}

fn convert_group(
    group: &ImageGroup,
    config: &ConversionConfig,
    report: &mut ConversionReport,
) -> GroupResult {
    debug!(group = %group.base_name, images = group.len(), "converting group");
    let pages = decode_group(group, config.jpeg_quality, &mut report.errors);
    if pages.is_empty() {
        warn!(group = %group.base_name, "no decodable images, skipping output");
        return GroupResult::default();
    }

    let mut builder = PdfDocumentBuilder::new();
    let mut embedded_files = Vec::new();
    for (source, img) in pages {
        let layout = layout_a4(img.width, img.height);
        builder.add_page(img.jpeg, img.width, img.height, &layout);
        if let Some(file) = source {
            embedded_files.push(file);
        }
    }

    let out_path = naming::resolve(&config.output_dir, &group.base_name);
    let page_count = builder.page_count();
    match builder.save(&out_path) {
        Ok(()) => {
            info!(output = %out_path.display(), pages = page_count, "wrote PDF");
            report.record_written(out_path);
            GroupResult {
                embedded_files,
                embedded_entries: page_count,
            }
        }
        Err(e) => {
            warn!(output = %out_path.display(), error = %e, "failed to write PDF");
            report
                .errors
                .push(ItemError::new(&out_path, ItemErrorKind::Write(e.to_string())));
            GroupResult::default()
        }
    }
}

/// Decode every image in the group, in order, skipping and recording
/// failures. For loose files the source path rides along so cleanup can
/// delete exactly the embedded ones.
fn decode_group(
    group: &ImageGroup,
    jpeg_quality: u8,
    errors: &mut Vec<ItemError>,
) -> Vec<(Option<PathBuf>, DecodedImage)> {
    match &group.source {
        GroupSource::Directory { files } => {
            let mut pages = Vec::with_capacity(files.len());
            for file in files {
                let bytes = match fs::read(file) {
                    Ok(b) => b,
                    Err(e) => {
                        errors.push(ItemError::new(file, ItemErrorKind::Decode(e.to_string())));
                        continue;
                    }
                };
                match codec::decode(&bytes, jpeg_quality) {
                    Ok(img) => pages.push((Some(file.clone()), img)),
                    Err(e) => {
                        warn!(file = %file.display(), error = %e, "skipping undecodable image");
                        errors.push(ItemError::new(file, ItemErrorKind::Decode(e.to_string())));
                    }
                }
            }
            pages
        }
        GroupSource::Archive { archive, entries } => {
            let mut zip = match fs::File::open(archive).map_err(zip::result::ZipError::from).and_then(ZipArchive::new) {
                Ok(z) => z,
                Err(e) => {
                    errors.push(ItemError::new(archive, ItemErrorKind::Archive(e.to_string())));
                    return Vec::new();
                }
            };
            let mut pages = Vec::with_capacity(entries.len());
            for name in entries {
                let mut bytes = Vec::new();
                match zip.by_name(name) {
                    Ok(mut entry) => {
                        if let Err(e) = entry.read_to_end(&mut bytes) {
                            errors.push(ItemError::for_entry(
                                archive,
                                name,
                                ItemErrorKind::Archive(e.to_string()),
                            ));
                            continue;
                        }
                    }
                    Err(e) => {
                        errors.push(ItemError::for_entry(
                            archive,
                            name,
                            ItemErrorKind::Archive(e.to_string()),
                        ));
                        continue;
                    }
                }
                match codec::decode(&bytes, jpeg_quality) {
                    Ok(img) => pages.push((None, img)),
                    Err(e) => {
                        warn!(entry = %name, archive = %archive.display(), error = %e, "skipping undecodable entry");
                        errors.push(ItemError::for_entry(
                            archive,
                            name,
                            ItemErrorKind::Decode(e.to_string()),
                        ));
                    }
                }
            }
            pages
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_detection_is_case_insensitive_and_requires_a_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let upper = tmp.path().join("A.ZIP");
        fs::write(&upper, b"x").expect("write");
        assert!(is_zip_file(&upper));
        assert!(!is_zip_file(tmp.path()));
        assert!(!is_zip_file(&tmp.path().join("missing.zip")));
    }

    #[test]
    fn non_input_path_is_recorded_not_fatal() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let cfg = ConversionConfig::builder()
            .output_dir(tmp.path().join("out"))
            .build()
            .expect("config");
        let report = convert(tmp.path().join("nope.txt"), &cfg).expect("convert");
        assert_eq!(report.pdfs_created, 0);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(report.errors[0].kind, ItemErrorKind::InvalidInput));
    }

    #[test]
    fn prune_removes_only_empty_dirs_bottom_up() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path().join("r");
        fs::create_dir_all(root.join("a/b")).expect("mkdir");
        fs::create_dir_all(root.join("keep")).expect("mkdir");
        fs::write(root.join("keep/file.txt"), b"x").expect("write");

        prune_empty_dirs(&root);
        assert!(!root.join("a").exists());
        assert!(root.join("keep/file.txt").exists());
        assert!(root.exists());
    }
}
