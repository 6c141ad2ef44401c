use std::path::PathBuf;

/// A single node produced by a [`Source`](crate::traits::Source) during traversal.
///
/// Filters only look at `name` and `kind`. `path` is carried for the
/// hashing stage downstream and is never consulted by [`PathFilter`](crate::PathFilter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Full path to the entry.
    pub path: PathBuf,

    /// The final path component, case-preserved as the filesystem reports it.
    pub name: String,

    /// What kind of entry this is.
    pub kind: EntryKind,

    /// How deep in the traversal this entry was found. Root = 0.
    pub depth: usize,
}

impl Entry {
    /// A regular file entry. `name` is taken from the last component of `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::with_kind(path.into(), EntryKind::File)
    }

    /// A directory entry. `name` is taken from the last component of `path`.
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self::with_kind(path.into(), EntryKind::Dir)
    }

    fn with_kind(path: PathBuf, kind: EntryKind) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            kind,
            depth: 0,
        }
    }

    /// Set the traversal depth.
    pub fn at_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Whether this entry is a directory. Symlinks to directories are not,
    /// unless the source was told to follow links.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// The kind of a traversed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A regular file.
    File,

    /// A directory.
    Dir,

    /// A symbolic link that was not followed.
    Symlink,

    /// Anything else (device files, pipes, sockets, etc.).
    Other,
}

impl EntryKind {
    /// Map a `std::fs::FileType` onto an entry kind.
    pub fn from_file_type(ft: std::fs::FileType) -> Self {
        if ft.is_dir() {
            EntryKind::Dir
        } else if ft.is_file() {
            EntryKind::File
        } else if ft.is_symlink() {
            EntryKind::Symlink
        } else {
            EntryKind::Other
        }
    }
}
