use std::sync::Arc;

use crate::engine::WalkConfig;
use crate::entry::Entry;
use crate::error::IntegrityError;

/// Decides whether an entry belongs to the scanned set.
///
/// Traversal takes a `Filter` by composition. On a directory, `false` prunes
/// the whole subtree; on anything else, `false` drops the entry from the
/// candidate list handed to the hashing stage.
///
/// # Thread Safety
///
/// `Send + Sync` are required. One filter is shared across walker threads and
/// called concurrently on different entries, in no particular order.
/// Implementations must be pure: the same entry always gets the same answer.
///
/// Any `Fn(&Entry) -> bool + Send + Sync` is a filter:
///
/// ```rust
/// use integrity_scope::{Entry, Filter};
///
/// let no_logs = |e: &Entry| !e.name.ends_with(".log");
/// assert!(no_logs.accept(&Entry::file("index.php")));
/// assert!(!no_logs.accept(&Entry::file("debug.log")));
/// ```
pub trait Filter: Send + Sync {
    /// Returns `true` if this entry should be traversed (directories) or
    /// scanned (everything else).
    fn accept(&self, entry: &Entry) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&Entry) -> bool + Send + Sync,
{
    fn accept(&self, entry: &Entry) -> bool {
        self(entry)
    }
}

/// A tree to walk.
///
/// # Object Safety
///
/// `Source` is object-safe. The builder stores sources as `Box<dyn Source>`,
/// so `walk()` returns a boxed iterator.
///
/// # Contract
///
/// - The root itself is not yielded.
/// - Every node is yielded at most once per walk.
/// - A directory is only descended into if `filter.accept` returned `true` for
///   it. A rejected directory is not yielded either.
/// - `config.max_depth` and `config.follow_links` are honoured.
/// - Recoverable failures (unreadable directories, loops) are yielded as `Err`
///   rather than ending the walk.
///
/// Non-directory entries are yielded whether or not the filter accepts them;
/// membership is decided by the engine.
pub trait Source: Send + Sync {
    /// Check the source before the walk starts.
    ///
    /// A root that does not exist must fail here, not walk as an empty tree.
    fn validate(&self) -> Result<(), IntegrityError> {
        Ok(())
    }

    /// Traverse the tree and yield visited entries.
    fn walk(
        &self,
        config: &WalkConfig,
        filter: Arc<dyn Filter>,
    ) -> Box<dyn Iterator<Item = Result<Entry, IntegrityError>>>;
}
