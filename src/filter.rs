use std::collections::HashSet;

use crate::config::ExclusionConfig;
use crate::entry::Entry;
use crate::traits::Filter;

/// File names excluded by exact, case-sensitive equality.
pub const DEFAULT_EXACT_NAMES: &[&str] = &[
    ".DS_Store",  // macOS Finder
    "Thumbs.db",  // Windows Explorer
    ".directory", // Dolphin (KDE)
    ".webapp",    // webapp-config (Gentoo, Funtoo)
];

/// Fragments that exclude any file whose name contains them.
pub const DEFAULT_SUBSTRINGS: &[&str] = &[
    ".webapp-nextcloud-", // webapp-config install markers, variable suffix
];

/// The marker fragment webapp-config embeds in file names it installs for
/// `platform`, e.g. `.webapp-nextcloud-`.
pub fn webapp_marker(platform: &str) -> String {
    format!(".webapp-{platform}-")
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Why an entry was kept or dropped. [`PathFilter::accept`] is exactly
/// `decide(entry).is_included()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Directories always pass.
    Directory,

    /// No exclusion rule matched.
    Included,

    /// The name equals this entry of the exact-name set.
    ExcludedByName(String),

    /// The name contains this fragment.
    ExcludedBySubstring(String),
}

impl Decision {
    pub fn is_included(&self) -> bool {
        matches!(self, Decision::Directory | Decision::Included)
    }
}

// ---------------------------------------------------------------------------
// PathFilter
// ---------------------------------------------------------------------------

/// Decides which files take part in an integrity check.
///
/// Rules, applied in order:
///
/// 1. Directories are always accepted, whatever their name.
/// 2. A file whose name is in the exact-name set is rejected. Comparison is
///    case-sensitive, so `.ds_store` is kept.
/// 3. A file whose name contains any listed substring is rejected.
/// 4. Everything else is accepted, including files with an empty name.
///
/// Rule 1 means a directory called `.DS_Store` is still descended into and
/// its contents are still scanned. Name rules never prune a subtree; widening
/// them to directories would shrink what gets checked.
///
/// The filter holds no mutable state and is safe to share between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFilter {
    exact_names: HashSet<String>,
    substrings:  Vec<String>,
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EXACT_NAMES.iter().copied(), DEFAULT_SUBSTRINGS.iter().copied())
    }
}

impl PathFilter {
    /// Build a filter from explicit exclusion data.
    ///
    /// Empty substrings are dropped: `""` is contained in every name and
    /// would exclude the whole tree.
    pub fn new<E, S>(exact_names: E, substrings: S) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        let exact_names: HashSet<String> = exact_names.into_iter().map(Into::into).collect();

        let mut kept = Vec::new();
        for s in substrings.into_iter().map(Into::into) {
            if s.is_empty() {
                tracing::warn!("ignoring empty substring exclusion, it would match every file");
                continue;
            }
            if !kept.contains(&s) {
                kept.push(s);
            }
        }

        tracing::trace!(
            exact = exact_names.len(),
            substrings = kept.len(),
            "built path filter"
        );

        Self {
            exact_names,
            substrings: kept,
        }
    }

    /// A filter that excludes nothing.
    pub fn empty() -> Self {
        Self {
            exact_names: HashSet::new(),
            substrings:  Vec::new(),
        }
    }

    /// Start from nothing and add rules one by one.
    pub fn builder() -> PathFilterBuilder {
        PathFilterBuilder::default()
    }

    /// Build a filter from loaded configuration.
    pub fn from_config(config: &ExclusionConfig) -> Self {
        Self::new(config.exact_names.iter().cloned(), config.substrings.iter().cloned())
    }

    /// Exact names, sorted for stable display.
    pub fn exact_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.exact_names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Substring fragments in the order they were given.
    pub fn substrings(&self) -> &[String] {
        &self.substrings
    }

    /// Classify an entry.
    pub fn decide(&self, entry: &Entry) -> Decision {
        self.decide_name(&entry.name, entry.is_dir())
    }

    /// [`accept`](Filter::accept) on a bare name, for callers without an [`Entry`].
    pub fn accept_name(&self, name: &str, is_dir: bool) -> bool {
        self.decide_name(name, is_dir).is_included()
    }

    fn decide_name(&self, name: &str, is_dir: bool) -> Decision {
        if is_dir {
            return Decision::Directory;
        }

        if let Some(exact) = self.exact_names.get(name) {
            return Decision::ExcludedByName(exact.clone());
        }

        if let Some(fragment) = self.substrings.iter().find(|s| name.contains(s.as_str())) {
            return Decision::ExcludedBySubstring(fragment.clone());
        }

        Decision::Included
    }
}

impl Filter for PathFilter {
    fn accept(&self, entry: &Entry) -> bool {
        self.decide(entry).is_included()
    }
}

// ---------------------------------------------------------------------------
// PathFilterBuilder
// ---------------------------------------------------------------------------

/// Incremental construction of a [`PathFilter`].
///
/// ```rust
/// use integrity_scope::{Entry, Filter, PathFilter};
///
/// let filter = PathFilter::builder()
///     .with_defaults()
///     .webapp_platform("owncloud")
///     .exact_name("desktop.ini")
///     .build();
///
/// assert!(!filter.accept(&Entry::file("index.php.webapp-owncloud-7")));
/// assert!(!filter.accept(&Entry::file("desktop.ini")));
/// assert!(filter.accept(&Entry::file("index.php")));
/// ```
#[derive(Debug, Default, Clone)]
pub struct PathFilterBuilder {
    exact_names: Vec<String>,
    substrings:  Vec<String>,
}

impl PathFilterBuilder {
    /// Add the baseline OS and package-manager noise.
    pub fn with_defaults(mut self) -> Self {
        self.exact_names.extend(DEFAULT_EXACT_NAMES.iter().map(|s| s.to_string()));
        self.substrings.extend(DEFAULT_SUBSTRINGS.iter().map(|s| s.to_string()));
        self
    }

    /// Exclude files named exactly `name`.
    pub fn exact_name(mut self, name: impl Into<String>) -> Self {
        self.exact_names.push(name.into());
        self
    }

    /// Exclude files whose name contains `fragment`.
    pub fn substring(mut self, fragment: impl Into<String>) -> Self {
        self.substrings.push(fragment.into());
        self
    }

    /// Exclude webapp-config markers for another platform.
    pub fn webapp_platform(self, platform: &str) -> Self {
        self.substring(webapp_marker(platform))
    }

    pub fn build(self) -> PathFilter {
        PathFilter::new(self.exact_names, self.substrings)
    }
}
