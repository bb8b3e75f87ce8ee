//! Group discovery: partition image files into per-directory groups.
//!
//! A *group* is a directory (physical, or virtual inside a ZIP archive)
//! that directly contains at least one accepted image file. Each group
//! becomes exactly one output PDF. Groups are never merged across nesting
//! levels: `root/a.png` and `root/sub/b.png` land in two different PDFs.
//!
//! Groups are keyed in a `BTreeMap`, so iteration order is deterministic
//! (sorted by directory key) and images within a group are sorted
//! lexicographically by name. Empty groups cannot exist by construction.

use crate::error::{ItemError, ItemErrorKind};
use crate::pipeline::codec::has_image_extension;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::ZipArchive;

/// Where a group's image bytes live.
#[derive(Debug, Clone)]
pub enum GroupSource {
    /// Loose files on disk, sorted by file name.
    Directory { files: Vec<PathBuf> },
    /// Entries inside a ZIP archive, sorted by entry name. Bytes are read
    /// straight from the archive at conversion time, never extracted.
    Archive { archive: PathBuf, entries: Vec<String> },
}

/// One directory's worth of images, destined for one PDF.
#[derive(Debug, Clone)]
pub struct ImageGroup {
    /// Output base name (without the `.pdf` extension).
    pub base_name: String,
    pub source: GroupSource,
}

impl ImageGroup {
    /// Number of images in the group. Always ≥ 1.
    pub fn len(&self) -> usize {
        match &self.source {
            GroupSource::Directory { files } => files.len(),
            GroupSource::Archive { entries, .. } => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Discover groups inside a ZIP archive without extracting it.
///
/// Entries are partitioned by their directory component (archive paths
/// normalised to `/`). The root component maps to the archive's stem;
/// nested components map to `{stem}_{dir with '/' → '_'}`.
///
/// An unreadable archive yields one [`ItemErrorKind::Archive`] record and
/// zero groups.
pub fn discover_zip(archive: &Path, errors: &mut Vec<ItemError>) -> Vec<ImageGroup> {
    let file = match File::open(archive) {
        Ok(f) => f,
        Err(e) => {
            warn!(archive = %archive.display(), error = %e, "cannot open archive");
            errors.push(ItemError::new(archive, ItemErrorKind::Archive(e.to_string())));
            return Vec::new();
        }
    };
    let mut zip = match ZipArchive::new(file) {
        Ok(z) => z,
        Err(e) => {
            warn!(archive = %archive.display(), error = %e, "cannot read archive");
            errors.push(ItemError::new(archive, ItemErrorKind::Archive(e.to_string())));
            return Vec::new();
        }
    };

    let mut by_dir: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for i in 0..zip.len() {
        let entry = match zip.by_index(i) {
            Ok(e) => e,
            Err(e) => {
                errors.push(ItemError::new(archive, ItemErrorKind::Archive(e.to_string())));
                continue;
            }
        };
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().replace('\\', "/");
        if !has_image_extension(&name) {
            continue;
        }
        let dir = name.rsplit_once('/').map(|(d, _)| d.to_string()).unwrap_or_default();
        by_dir.entry(dir).or_default().push(name);
    }

    let stem = file_stem_string(archive);
    by_dir
        .into_iter()
        .map(|(dir, mut entries)| {
            entries.sort();
            let base_name = if dir.is_empty() {
                stem.clone()
            } else {
                format!("{stem}_{}", dir.replace('/', "_"))
            };
            debug!(archive = %archive.display(), group = %base_name, images = entries.len(), "discovered archive group");
            ImageGroup {
                base_name,
                source: GroupSource::Archive {
                    archive: archive.to_path_buf(),
                    entries,
                },
            }
        })
        .collect()
}

/// Discover groups inside a directory tree.
///
/// One walk collects loose image files grouped by parent directory and
/// every `.zip` file anywhere in the tree; each archive contributes its
/// own groups via [`discover_zip`]. Archive groups come first, then loose
/// groups sorted by directory path.
///
/// Unvisitable entries (permissions, dangling links) are recorded as
/// [`ItemErrorKind::Walk`] and skipped; the walk itself never fails.
pub fn discover_dir(root: &Path, errors: &mut Vec<ItemError>) -> Vec<ImageGroup> {
    let mut zips: Vec<PathBuf> = Vec::new();
    let mut by_dir: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let at = e.path().unwrap_or(root).to_path_buf();
                warn!(path = %at.display(), error = %e, "skipping unreadable entry");
                errors.push(ItemError::new(&at, ItemErrorKind::Walk(e.to_string())));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.to_ascii_lowercase().ends_with(".zip") {
            zips.push(entry.path().to_path_buf());
        } else if has_image_extension(&name) {
            let parent = entry
                .path()
                .parent()
                .unwrap_or(root)
                .to_path_buf();
            by_dir.entry(parent).or_default().push(entry.path().to_path_buf());
        }
    }

    let mut groups: Vec<ImageGroup> = Vec::new();
    for zip_path in &zips {
        groups.extend(discover_zip(zip_path, errors));
    }

    for (dir, mut files) in by_dir {
        files.sort();
        let base_name = group_base_name(root, &dir);
        debug!(dir = %dir.display(), group = %base_name, images = files.len(), "discovered directory group");
        groups.push(ImageGroup {
            base_name,
            source: GroupSource::Directory { files },
        });
    }
    groups
}

/// Root group takes the input directory's own name; nested groups take
/// the path relative to the root with separators replaced by `_`.
fn group_base_name(root: &Path, dir: &Path) -> String {
    if dir == root {
        return file_stem_for_dir(root);
    }
    match dir.strip_prefix(root) {
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("_"),
        Err(_) => file_stem_for_dir(dir),
    }
}

fn file_stem_string(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "images".to_string())
}

fn file_stem_for_dir(dir: &Path) -> String {
    dir.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "images".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write as _;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, b"not really an image, discovery only checks names").expect("write");
    }

    fn write_zip(path: &Path, names: &[&str]) {
        let file = File::create(path).expect("create zip");
        let mut zip = ZipWriter::new(file);
        let opts = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for name in names {
            zip.start_file(*name, opts).expect("start entry");
            zip.write_all(b"bytes").expect("write entry");
        }
        zip.finish().expect("finish zip");
    }

    #[test]
    fn directory_groups_are_per_parent_dir() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path().join("shoot");
        touch(&root.join("a.png"));
        touch(&root.join("b.jpg"));
        touch(&root.join("sub/c.png"));
        touch(&root.join("sub/deeper/d.bmp"));
        touch(&root.join("notes.txt"));

        let mut errors = Vec::new();
        let groups = discover_dir(&root, &mut errors);
        assert!(errors.is_empty());

        let names: Vec<&str> = groups.iter().map(|g| g.base_name.as_str()).collect();
        assert_eq!(names, vec!["shoot", "sub", "sub_deeper"]);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn images_within_a_group_are_sorted() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path().join("r");
        touch(&root.join("z.png"));
        touch(&root.join("a.png"));
        touch(&root.join("m.png"));

        let groups = discover_dir(&root, &mut Vec::new());
        let GroupSource::Directory { files } = &groups[0].source else {
            panic!("expected directory source");
        };
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().expect("name").to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "m.png", "z.png"]);
    }

    #[test]
    fn imageless_directories_form_no_group() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path().join("r");
        fs::create_dir_all(root.join("empty/nested")).expect("mkdir");
        touch(&root.join("docs/readme.txt"));

        let groups = discover_dir(&root, &mut Vec::new());
        assert!(groups.is_empty());
        assert!(groups.iter().all(|g| !g.is_empty()));
    }

    #[test]
    fn zip_entries_partition_by_directory_component() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let zip_path = tmp.path().join("photos.zip");
        write_zip(
            &zip_path,
            &["a.png", "album/b.png", "album/a.png", "album/sub/c.jpg", "skip.txt"],
        );

        let mut errors = Vec::new();
        let groups = discover_zip(&zip_path, &mut errors);
        assert!(errors.is_empty());

        let names: Vec<&str> = groups.iter().map(|g| g.base_name.as_str()).collect();
        assert_eq!(names, vec!["photos", "photos_album", "photos_album_sub"]);

        let GroupSource::Archive { entries, .. } = &groups[1].source else {
            panic!("expected archive source");
        };
        assert_eq!(entries, &["album/a.png", "album/b.png"]);
    }

    #[test]
    fn unreadable_zip_records_one_error_and_no_groups() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let bogus = tmp.path().join("broken.zip");
        fs::write(&bogus, b"this is not a zip archive").expect("write");

        let mut errors = Vec::new();
        let groups = discover_zip(&bogus, &mut errors);
        assert!(groups.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0].kind, ItemErrorKind::Archive(_)));
    }

    #[test]
    fn zips_inside_a_tree_contribute_their_own_groups() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path().join("r");
        touch(&root.join("loose.png"));
        fs::create_dir_all(root.join("nested")).expect("mkdir");
        write_zip(&root.join("nested/pack.zip"), &["x.png"]);

        let groups = discover_dir(&root, &mut Vec::new());
        let names: Vec<&str> = groups.iter().map(|g| g.base_name.as_str()).collect();
        // Archive groups come before loose groups.
        assert_eq!(names, vec!["pack", "r"]);
    }
}
