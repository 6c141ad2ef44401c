use std::sync::Arc;

use crate::engine::{run, EngineOptions, WalkConfig};
use crate::error::IntegrityError;
use crate::filter::PathFilter;
use crate::results::ScanResults;
use crate::traits::{Filter, Source};

// ---------------------------------------------------------------------------
// ScanBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and running a scan.
///
/// Created via [`integrity_scope::scan()`](crate::scan). Configure with
/// chained builder methods, then call [`run()`](ScanBuilder::run).
///
/// # Example
///
/// ```rust,ignore
/// let results = integrity_scope::scan()
///     .source(DirectorySource::new("/var/www/nextcloud"))
///     .filter(PathFilter::default())
///     .threads(8)
///     .collect_errors(true)
///     .run()?;
/// ```
pub struct ScanBuilder {
    source:           Option<Box<dyn Source>>,
    filter:           Option<Arc<dyn Filter>>,
    threads:          usize,
    max_depth:        Option<usize>,
    follow_links:     bool,
    collect_excluded: bool,
    collect_errors:   bool,
}

impl Default for ScanBuilder {
    fn default() -> Self {
        Self {
            source:           None,
            filter:           None,
            threads:          num_cpus(),
            max_depth:        None,
            follow_links:     false,
            collect_excluded: false,
            collect_errors:   false,
        }
    }
}

impl ScanBuilder {
    // ── Source ────────────────────────────────────────────────────────────

    /// Set the tree to scan.
    pub fn source(mut self, s: impl Source + 'static) -> Self {
        self.source = Some(Box::new(s));
        self
    }

    // ── Filter ────────────────────────────────────────────────────────────

    /// Use a [`PathFilter`]. Without one, [`PathFilter::default()`] applies.
    pub fn filter(mut self, f: PathFilter) -> Self {
        self.filter = Some(Arc::new(f));
        self
    }

    /// Use any [`Filter`], including a closure.
    pub fn with_filter(mut self, f: impl Filter + 'static) -> Self {
        self.filter = Some(Arc::new(f));
        self
    }

    /// Share one filter between several scans.
    pub fn shared_filter(mut self, f: Arc<dyn Filter>) -> Self {
        self.filter = Some(f);
        self
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Number of walker threads. Defaults to the logical CPU count.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = n;
        self
    }

    /// Maximum traversal depth. `0` means the root only, `1` means one
    /// level of children, and so on. Unlimited by default.
    pub fn max_depth(mut self, d: usize) -> Self {
        self.max_depth = Some(d);
        self
    }

    /// Follow symbolic links. Off by default; unfollowed links are scanned
    /// as files.
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }

    /// Collect rejected file paths into [`ScanResults::excluded`].
    pub fn collect_excluded(mut self, yes: bool) -> Self {
        self.collect_excluded = yes;
        self
    }

    /// Collect non-fatal walk errors into [`ScanResults::errors`].
    ///
    /// When disabled, unreadable entries are skipped and only logged.
    pub fn collect_errors(mut self, yes: bool) -> Self {
        self.collect_errors = yes;
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Run the scan and return the candidate file list.
    ///
    /// # Errors
    ///
    /// Returns `Err` when no source was set, the source fails validation,
    /// or the thread count is zero. Errors during the walk itself are
    /// collected into [`ScanResults::errors`] when `.collect_errors(true)`
    /// is set.
    pub fn run(self) -> Result<ScanResults, IntegrityError> {
        let source = self
            .source
            .ok_or_else(|| IntegrityError::InvalidSource("no source provided".into()))?;
        source.validate()?;

        if self.threads == 0 {
            return Err(IntegrityError::InvalidThreadCount(0));
        }

        // Default filter: the baseline noise list
        let filter: Arc<dyn Filter> = match self.filter {
            Some(f) => f,
            None    => Arc::new(PathFilter::default()),
        };

        let opts = EngineOptions {
            config: WalkConfig {
                threads:      self.threads,
                max_depth:    self.max_depth,
                follow_links: self.follow_links,
            },
            source,
            filter,
            collect_excluded: self.collect_excluded,
            collect_errors:   self.collect_errors,
        };

        Ok(run(opts))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Get the logical CPU count, with a safe fallback.
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
