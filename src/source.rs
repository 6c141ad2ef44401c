use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ignore::{DirEntry, WalkBuilder, WalkState};

use crate::engine::WalkConfig;
use crate::entry::{Entry, EntryKind};
use crate::error::{from_ignore, IntegrityError};
use crate::traits::{Filter, Source};

// ---------------------------------------------------------------------------
// DirectorySource
// ---------------------------------------------------------------------------

/// Walks a real directory tree in parallel.
///
/// Nothing is skipped implicitly: hidden files are scanned and `.gitignore`,
/// `.ignore` and global excludes are not honoured. Whatever the installation
/// contains is a candidate until the [`Filter`] says otherwise.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Source for DirectorySource {
    fn validate(&self) -> Result<(), IntegrityError> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(IntegrityError::InvalidSource(format!(
                "{} is not a directory",
                self.root.display()
            )))
        }
    }

    fn walk(
        &self,
        config: &WalkConfig,
        filter: Arc<dyn Filter>,
    ) -> Box<dyn Iterator<Item = Result<Entry, IntegrityError>>> {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .hidden(false)
            .ignore(false)
            .parents(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .follow_links(config.follow_links)
            .same_file_system(false)
            .max_depth(config.max_depth)
            .threads(config.threads);

        // Pruning: a rejected directory is neither yielded nor descended into.
        builder.filter_entry(move |dent: &DirEntry| {
            if dent.depth() == 0 || !dent.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }
            let entry = to_entry(dent, EntryKind::Dir);
            let keep = filter.accept(&entry);
            if !keep {
                tracing::debug!(path = %entry.path.display(), "pruned directory");
            }
            keep
        });

        let walker = builder.build_parallel();
        let found = Arc::new(Mutex::new(Vec::<Result<Entry, IntegrityError>>::new()));

        walker.run(|| {
            let found = Arc::clone(&found);

            Box::new(move |res: Result<DirEntry, ignore::Error>| -> WalkState {
                let item = match res {
                    Ok(dent) => {
                        // Skip the root itself
                        if dent.depth() == 0 {
                            return WalkState::Continue;
                        }
                        let kind = match dent.file_type() {
                            Some(ft) => EntryKind::from_file_type(ft),
                            None => EntryKind::Other,
                        };
                        Ok(to_entry(&dent, kind))
                    }
                    Err(e) => Err(from_ignore(e)),
                };

                if let Ok(mut f) = found.lock() {
                    f.push(item);
                }
                WalkState::Continue
            })
        });

        let found = Arc::try_unwrap(found)
            .unwrap_or_default()
            .into_inner()
            .unwrap_or_default();
        Box::new(found.into_iter())
    }
}

fn to_entry(dent: &DirEntry, kind: EntryKind) -> Entry {
    Entry {
        path:  dent.path().to_path_buf(),
        name:  dent.file_name().to_string_lossy().into_owned(),
        kind,
        depth: dent.depth(),
    }
}

// ---------------------------------------------------------------------------
// MemoryTree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Node {
    File,
    Dir(BTreeMap<String, Node>),
}

/// A synthetic directory tree, for exercising filters and the engine without
/// touching the filesystem.
///
/// Paths are `/`-separated and relative to the root. Missing parents are
/// created as directories; a trailing `/` marks a directory.
///
/// ```rust
/// use integrity_scope::MemoryTree;
///
/// let tree = MemoryTree::from_paths("/", ["src/app.php", "src/.DS_Store", "vendor/"]);
/// assert_eq!(tree.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryTree {
    root:     PathBuf,
    children: BTreeMap<String, Node>,
}

impl MemoryTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root:     root.into(),
            children: BTreeMap::new(),
        }
    }

    /// Build a tree from a list of paths. Entries ending in `/` are directories.
    pub fn from_paths<I, S>(root: impl Into<PathBuf>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths.into_iter().fold(Self::new(root), |tree, p| {
            let p = p.as_ref();
            if p.ends_with('/') {
                tree.dir(p)
            } else {
                tree.file(p)
            }
        })
    }

    /// Add a file, creating its parent directories.
    pub fn file(mut self, path: &str) -> Self {
        self.insert(path, false);
        self
    }

    /// Add an (possibly empty) directory, creating its parents.
    pub fn dir(mut self, path: &str) -> Self {
        self.insert(path, true);
        self
    }

    /// Number of nodes below the root.
    pub fn len(&self) -> usize {
        fn count(children: &BTreeMap<String, Node>) -> usize {
            children
                .values()
                .map(|n| match n {
                    Node::File => 1,
                    Node::Dir(sub) => 1 + count(sub),
                })
                .sum()
        }
        count(&self.children)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn insert(&mut self, path: &str, is_dir: bool) {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((last, parents)) = parts.split_last() else {
            return;
        };

        let mut level = &mut self.children;
        for part in parents {
            let node = level
                .entry((*part).to_string())
                .or_insert_with(|| Node::Dir(BTreeMap::new()));
            if matches!(node, Node::File) {
                *node = Node::Dir(BTreeMap::new());
            }
            level = match node {
                Node::Dir(sub) => sub,
                Node::File => unreachable!("converted to a directory above"),
            };
        }

        if is_dir {
            let node = level
                .entry((*last).to_string())
                .or_insert_with(|| Node::Dir(BTreeMap::new()));
            if matches!(node, Node::File) {
                *node = Node::Dir(BTreeMap::new());
            }
        } else {
            level.insert((*last).to_string(), Node::File);
        }
    }
}

impl Source for MemoryTree {
    fn walk(
        &self,
        config: &WalkConfig,
        filter: Arc<dyn Filter>,
    ) -> Box<dyn Iterator<Item = Result<Entry, IntegrityError>>> {
        let mut out = Vec::new();
        visit(&self.children, &self.root, 1, config, filter.as_ref(), &mut out);
        Box::new(out.into_iter())
    }
}

fn visit(
    children: &BTreeMap<String, Node>,
    parent: &Path,
    depth: usize,
    config: &WalkConfig,
    filter: &dyn Filter,
    out: &mut Vec<Result<Entry, IntegrityError>>,
) {
    if config.max_depth.is_some_and(|max| depth > max) {
        return;
    }

    for (name, node) in children {
        let path = parent.join(name);
        match node {
            Node::File => out.push(Ok(Entry {
                path,
                name: name.clone(),
                kind: EntryKind::File,
                depth,
            })),
            Node::Dir(sub) => {
                let entry = Entry {
                    path,
                    name: name.clone(),
                    kind: EntryKind::Dir,
                    depth,
                };
                if !filter.accept(&entry) {
                    tracing::debug!(path = %entry.path.display(), "pruned directory");
                    continue;
                }
                let child_parent = entry.path.clone();
                out.push(Ok(entry));
                visit(sub, &child_parent, depth + 1, config, filter, out);
            }
        }
    }
}
