//! Run results: what was written, what failed.
//!
//! A run never aborts on per-item failures, so the report carries both the
//! successes (paths of written PDFs) and every recorded [`ItemError`].
//! The types are serde-serialisable for the CLI's `--json` mode.

use crate::error::ItemError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of converting one input (or, after merging, a whole batch).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Number of PDF files successfully written.
    pub pdfs_created: usize,
    /// Paths of the written PDFs, in processing order.
    pub written: Vec<PathBuf>,
    /// Non-fatal errors recorded along the way.
    pub errors: Vec<ItemError>,
}

impl ConversionReport {
    /// True when nothing failed.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fold another input's report into this one.
    pub fn merge(&mut self, other: ConversionReport) {
        self.pdfs_created += other.pdfs_created;
        self.written.extend(other.written);
        self.errors.extend(other.errors);
    }

    pub(crate) fn record_written(&mut self, path: PathBuf) {
        self.pdfs_created += 1;
        self.written.push(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ItemErrorKind;

    #[test]
    fn merge_accumulates_both_sides() {
        let mut a = ConversionReport::default();
        a.record_written(PathBuf::from("/out/root.pdf"));

        let mut b = ConversionReport::default();
        b.record_written(PathBuf::from("/out/sub.pdf"));
        b.errors
            .push(ItemError::new("/in/bad.png", ItemErrorKind::Decode("x".into())));

        a.merge(b);
        assert_eq!(a.pdfs_created, 2);
        assert_eq!(a.written.len(), 2);
        assert_eq!(a.errors.len(), 1);
        assert!(!a.is_clean());
    }

    #[test]
    fn empty_report_is_clean() {
        assert!(ConversionReport::default().is_clean());
    }
}
