//! # integrity-scope
//!
//! Decides which files of an installed application take part in a code
//! integrity check, and which are operating-system or package-manager noise.
//!
//! The policy lives in [`PathFilter`]: directories always pass, files are
//! dropped when their name is in an exact-name set (`.DS_Store`, `Thumbs.db`,
//! ...) or contains a marker fragment (`.webapp-nextcloud-`). Everything
//! else is handed to the hashing stage.
//!
//! Traversal is separate. A [`Source`] walks a tree and consults a [`Filter`]
//! before descending; the engine keeps the files the filter accepts. Hashing,
//! manifests and signatures are left to the caller.
//!
//! # Quick Start
//!
//! ```rust
//! use integrity_scope::{MemoryTree, PathFilter};
//!
//! let tree = MemoryTree::from_paths("/", [
//!     "src/app.php",
//!     "src/.DS_Store",
//!     "vendor/.webapp-nextcloud-photos",
//!     "vendor/lib.php",
//! ]);
//!
//! let results = integrity_scope::scan()
//!     .source(tree)
//!     .filter(PathFilter::default())
//!     .run()
//!     .unwrap();
//!
//! assert!(results.contains("/src/app.php"));
//! assert!(results.contains("/vendor/lib.php"));
//! assert_eq!(results.files.len(), 2);
//! ```
//!
//! # Loading exclusions
//!
//! ```rust
//! use integrity_scope::{Entry, ExclusionConfig, Filter, PathFilter};
//!
//! let config = ExclusionConfig::from_json_str(
//!     r#"{ "exactNames": ["desktop.ini"], "substrings": [".webapp-owncloud-"] }"#,
//! ).unwrap();
//! let filter = PathFilter::from_config(&config);
//!
//! assert!(!filter.accept(&Entry::file("desktop.ini")));
//! assert!(filter.accept(&Entry::file(".DS_Store")));
//! ```

#![forbid(unsafe_code)]

pub mod engine;

mod builder;
mod config;
mod entry;
mod error;
mod filter;
mod results;
mod source;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::ScanBuilder;
pub use config::ExclusionConfig;
pub use entry::{Entry, EntryKind};
pub use error::IntegrityError;
pub use filter::{
    webapp_marker, Decision, PathFilter, PathFilterBuilder, DEFAULT_EXACT_NAMES,
    DEFAULT_SUBSTRINGS,
};
pub use results::{ScanResults, ScanStats};
pub use source::{DirectorySource, MemoryTree};
pub use traits::{Filter, Source};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`ScanBuilder`] to configure and run a scan.
///
/// # Example
///
/// ```rust
/// use integrity_scope::MemoryTree;
///
/// let results = integrity_scope::scan()
///     .source(MemoryTree::from_paths("/app", ["index.php", "Thumbs.db"]))
///     .collect_excluded(true)
///     .run()
///     .unwrap();
///
/// assert_eq!(results.stats.files, 1);
/// assert_eq!(results.excluded.len(), 1);
/// ```
pub fn scan() -> ScanBuilder {
    ScanBuilder::default()
}
