//! Collision-free output naming.
//!
//! `resolve` probes `{base}.pdf`, `{base} (1).pdf`, `{base} (2).pdf`, …
//! and returns the first path that does not exist yet. The check and the
//! later create are not atomic; the engine assumes a single writer per
//! output directory, which holds for the sequential orchestrator.

use std::path::{Path, PathBuf};

/// First non-existing `{base}.pdf` variant inside `dir`.
pub fn resolve(dir: &Path, base: &str) -> PathBuf {
    let mut candidate = dir.join(format!("{base}.pdf"));
    let mut counter = 1u32;
    while candidate.exists() {
        candidate = dir.join(format!("{base} ({counter}).pdf"));
        counter += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn unclaimed_base_is_returned_as_is() {
        let dir = tempfile::tempdir().expect("tempdir");
        let p = resolve(dir.path(), "album");
        assert_eq!(p, dir.path().join("album.pdf"));
    }

    #[test]
    fn resolve_does_not_create_anything() {
        let dir = tempfile::tempdir().expect("tempdir");
        let p = resolve(dir.path(), "album");
        assert!(!p.exists());
        assert_eq!(fs::read_dir(dir.path()).expect("read dir").count(), 0);
    }

    #[test]
    fn probing_skips_existing_variants() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("album.pdf"), b"x").expect("write");
        fs::write(dir.path().join("album (1).pdf"), b"x").expect("write");
        fs::write(dir.path().join("album (2).pdf"), b"x").expect("write");
        let p = resolve(dir.path(), "album");
        assert_eq!(p, dir.path().join("album (3).pdf"));
    }

    #[test]
    fn gaps_are_filled_at_the_first_free_slot() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("album.pdf"), b"x").expect("write");
        fs::write(dir.path().join("album (2).pdf"), b"x").expect("write");
        // (1) is free, so probing stops there.
        let p = resolve(dir.path(), "album");
        assert_eq!(p, dir.path().join("album (1).pdf"));
    }
}
