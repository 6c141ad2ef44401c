use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::IntegrityError;

/// The candidate file list for the hashing stage.
///
/// `excluded` and `errors` are opt-in. Enable them on the builder with
/// `.collect_excluded(true)` and `.collect_errors(true)`.
#[derive(Debug)]
pub struct ScanResults {
    /// Files to hash, sorted.
    pub files: Vec<PathBuf>,

    /// Files the filter rejected, sorted.
    /// Only populated if `.collect_excluded(true)` was set on the builder.
    pub excluded: Vec<PathBuf>,

    /// Scan statistics.
    pub stats: ScanStats,

    /// Non-fatal errors encountered during the walk (permission denied, etc.).
    /// Only populated if `.collect_errors(true)` was set on the builder.
    pub errors: Vec<IntegrityError>,
}

impl ScanResults {
    /// Whether `path` made it into the scanned set.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.files
            .binary_search_by(|p| p.as_path().cmp(path.as_ref()))
            .is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Counts for a completed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// Files kept for hashing.
    pub files: usize,

    /// Files the filter rejected. Counted even when paths are not collected.
    pub excluded: usize,

    /// Directories visited. Pruned directories are not counted.
    pub dirs: usize,

    /// Wall-clock time of the walk.
    pub duration: Duration,
}
