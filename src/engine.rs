use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::error::IntegrityError;
use crate::results::{ScanResults, ScanStats};
use crate::traits::{Filter, Source};

// ---------------------------------------------------------------------------
// WalkConfig
// ---------------------------------------------------------------------------

/// Traversal parameters handed to a [`Source`].
///
/// Callers set these through the builder (`.threads()`, `.max_depth()`,
/// `.follow_links()`); sources read them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkConfig {
    pub threads:      usize,
    pub max_depth:    Option<usize>,
    pub follow_links: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            threads:      1,
            max_depth:    None,
            follow_links: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine options
// ---------------------------------------------------------------------------

/// Internal options passed from the builder to `run()`.
pub(crate) struct EngineOptions {
    pub config:           WalkConfig,
    pub source:           Box<dyn Source>,
    pub filter:           Arc<dyn Filter>,
    pub collect_excluded: bool,
    pub collect_errors:   bool,
}

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// Walk the source and split what it yields into scanned and excluded files.
///
/// Directories reaching this point were accepted by the source's pruning
/// check and are only counted. Every other entry goes through the filter.
/// Output lists are sorted so the result does not depend on walk order.
pub(crate) fn run(opts: EngineOptions) -> ScanResults {
    let start = Instant::now();

    let mut files    = Vec::<PathBuf>::new();
    let mut excluded = Vec::<PathBuf>::new();
    let mut errors   = Vec::<IntegrityError>::new();
    let mut excluded_count = 0usize;
    let mut dirs = 0usize;

    for item in opts.source.walk(&opts.config, Arc::clone(&opts.filter)) {
        let entry = match item {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                if opts.collect_errors {
                    errors.push(e);
                }
                continue;
            }
        };

        if entry.is_dir() {
            dirs += 1;
            continue;
        }

        if opts.filter.accept(&entry) {
            files.push(entry.path);
        } else {
            tracing::debug!(path = %entry.path.display(), "excluded from scan");
            excluded_count += 1;
            if opts.collect_excluded {
                excluded.push(entry.path);
            }
        }
    }

    files.sort();
    excluded.sort();

    let stats = ScanStats {
        files:    files.len(),
        excluded: excluded_count,
        dirs,
        duration: start.elapsed(),
    };

    tracing::debug!(
        files = stats.files,
        excluded = stats.excluded,
        dirs = stats.dirs,
        errors = errors.len(),
        elapsed = ?stats.duration,
        "scan finished"
    );

    ScanResults {
        files,
        excluded,
        stats,
        errors,
    }
}
