use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use integrity_scope::engine::WalkConfig;
use integrity_scope::{
    scan, DirectorySource, Entry, EntryKind, ExclusionConfig, Filter, IntegrityError, MemoryTree,
    PathFilter, Source,
};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Create an installation tree with the usual noise mixed in.
///
/// Structure:
/// ```text
/// tmp/
///   index.php
///   .htaccess
///   Thumbs.db
///   src/
///     app.php
///     .DS_Store
///   vendor/
///     lib.php
///     .ds_store
///     .webapp-nextcloud-photos
///     lib.php.webapp-nextcloud-13
///   .DS_Store/            <- a directory, still scanned
///     payload.php
/// ```
fn setup_install_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write_file(&root.join("index.php"), "<?php require 'src/app.php';");
    write_file(&root.join(".htaccess"), "Deny from all");
    write_file(&root.join("Thumbs.db"), "thumbnail cache");
    write_file(&root.join("src/app.php"), "<?php echo 'app';");
    write_file(&root.join("src/.DS_Store"), "finder metadata");
    write_file(&root.join("vendor/lib.php"), "<?php // lib");
    write_file(&root.join("vendor/.ds_store"), "not really finder metadata");
    write_file(&root.join("vendor/.webapp-nextcloud-photos"), "webapp-config marker");
    write_file(&root.join("vendor/lib.php.webapp-nextcloud-13"), "webapp-config marker");
    write_file(&root.join(".DS_Store/payload.php"), "<?php // hidden payload");

    dir
}

fn relative(results: &[PathBuf], root: &Path) -> Vec<String> {
    results
        .iter()
        .map(|p| {
            p.strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

/// A caller-supplied source built on walkdir, to show the `Source` seam
/// works outside the crate.
struct WalkdirSource(PathBuf);

impl Source for WalkdirSource {
    fn walk(
        &self,
        config: &WalkConfig,
        filter: Arc<dyn Filter>,
    ) -> Box<dyn Iterator<Item = Result<Entry, IntegrityError>>> {
        let mut walker = walkdir::WalkDir::new(&self.0)
            .min_depth(1)
            .follow_links(config.follow_links)
            .sort_by_file_name();
        if let Some(max) = config.max_depth {
            walker = walker.max_depth(max);
        }

        let entries = walker
            .into_iter()
            .filter_entry(move |e| {
                !e.file_type().is_dir()
                    || filter.accept(&Entry {
                        path:  e.path().to_path_buf(),
                        name:  e.file_name().to_string_lossy().into_owned(),
                        kind:  EntryKind::Dir,
                        depth: e.depth(),
                    })
            })
            .map(|e| match e {
                Ok(e) => Ok(Entry {
                    name:  e.file_name().to_string_lossy().into_owned(),
                    path:  e.path().to_path_buf(),
                    kind:  EntryKind::from_file_type(e.file_type()),
                    depth: e.depth(),
                }),
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    Err(IntegrityError::Io {
                        path,
                        source: e
                            .into_io_error()
                            .unwrap_or_else(|| std::io::Error::other("walk error")),
                    })
                }
            })
            .collect::<Vec<_>>();
        Box::new(entries.into_iter())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn end_to_end_in_memory_tree() {
    let tree = MemoryTree::from_paths(
        "/",
        [
            "src/app.php",
            "src/.DS_Store",
            "vendor/.webapp-nextcloud-photos",
            "vendor/lib.php",
        ],
    );

    let results = scan().source(tree).run().unwrap();

    assert_eq!(
        results.files,
        vec![PathBuf::from("/src/app.php"), PathBuf::from("/vendor/lib.php")]
    );
    assert_eq!(results.stats.excluded, 2);
    assert_eq!(results.stats.dirs, 2);
}

#[test]
fn directory_source_drops_noise_and_keeps_payload() {
    let dir = setup_install_dir();
    let results = scan()
        .source(DirectorySource::new(dir.path()))
        .threads(4)
        .collect_excluded(true)
        .run()
        .unwrap();

    assert_eq!(
        relative(&results.files, dir.path()),
        vec![
            ".DS_Store/payload.php",
            ".htaccess",
            "index.php",
            "src/app.php",
            "vendor/.ds_store",
            "vendor/lib.php",
        ]
    );
    assert_eq!(
        relative(&results.excluded, dir.path()),
        vec![
            "Thumbs.db",
            "src/.DS_Store",
            "vendor/.webapp-nextcloud-photos",
            "vendor/lib.php.webapp-nextcloud-13",
        ]
    );
    assert_eq!(results.stats.files, 6);
    assert_eq!(results.stats.excluded, 4);
    assert_eq!(results.stats.dirs, 3);
}

#[test]
fn result_does_not_depend_on_thread_count() {
    let dir = setup_install_dir();
    let run = |threads| {
        scan()
            .source(DirectorySource::new(dir.path()))
            .threads(threads)
            .run()
            .unwrap()
            .files
    };

    let single = run(1);
    for threads in [2, 4, 8] {
        assert_eq!(run(threads), single, "threads = {threads}");
    }
}

#[test]
fn directory_and_walkdir_sources_agree() {
    let dir = setup_install_dir();

    let ours = scan()
        .source(DirectorySource::new(dir.path()))
        .run()
        .unwrap();
    let theirs = scan()
        .source(WalkdirSource(dir.path().to_path_buf()))
        .run()
        .unwrap();

    assert_eq!(ours.files, theirs.files);
    assert_eq!(ours.stats.excluded, theirs.stats.excluded);
}

#[test]
fn empty_filter_scans_everything() {
    let dir = setup_install_dir();
    let results = scan()
        .source(DirectorySource::new(dir.path()))
        .filter(PathFilter::empty())
        .run()
        .unwrap();

    assert_eq!(results.stats.files, 10);
    assert_eq!(results.stats.excluded, 0);
}

#[test]
fn custom_filter_can_prune_directories() {
    let dir = setup_install_dir();
    let skip_vendor = |e: &Entry| !(e.is_dir() && e.name == "vendor");

    let results = scan()
        .source(DirectorySource::new(dir.path()))
        .with_filter(skip_vendor)
        .run()
        .unwrap();

    assert!(results
        .files
        .iter()
        .all(|p| !p.starts_with(dir.path().join("vendor"))));
    assert!(results.contains(dir.path().join("src/app.php")));
}

#[test]
fn max_depth_stops_at_top_level() {
    let dir = setup_install_dir();
    let results = scan()
        .source(DirectorySource::new(dir.path()))
        .max_depth(1)
        .run()
        .unwrap();

    assert_eq!(
        relative(&results.files, dir.path()),
        vec![".htaccess", "index.php"]
    );
}

#[test]
fn filter_loaded_from_config_file() {
    let dir = setup_install_dir();
    let config_path = dir.path().join("exclusions.toml");
    write_file(&config_path, "exactNames = [\"index.php\", \"exclusions.toml\"]\n");

    let config = ExclusionConfig::load(&config_path).unwrap();
    let results = scan()
        .source(DirectorySource::new(dir.path()))
        .filter(PathFilter::from_config(&config))
        .run()
        .unwrap();

    assert!(!results.contains(dir.path().join("index.php")));
    assert!(!results.contains(&config_path));
    // The config names no substrings, so markers are back in.
    assert!(results.contains(dir.path().join("vendor/.webapp-nextcloud-photos")));
}

#[test]
fn missing_root_fails_before_walking() {
    let dir = tempfile::tempdir().unwrap();
    let err = scan()
        .source(DirectorySource::new(dir.path().join("not-installed")))
        .run()
        .unwrap_err();
    assert!(matches!(err, IntegrityError::InvalidSource(_)));
}

#[test]
fn one_filter_shared_across_parallel_scans() {
    let dir = setup_install_dir();
    let filter: Arc<dyn Filter> = Arc::new(PathFilter::default());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let filter = Arc::clone(&filter);
            let root = dir.path().to_path_buf();
            std::thread::spawn(move || {
                scan()
                    .source(DirectorySource::new(root))
                    .shared_filter(filter)
                    .run()
                    .unwrap()
                    .files
            })
        })
        .collect();

    let all: Vec<Vec<PathBuf>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(all.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(all[0].len(), 6);
}

#[test]
fn errors_empty_when_not_collecting() {
    let dir = setup_install_dir();
    let results = scan()
        .source(DirectorySource::new(dir.path()))
        .run()
        .unwrap();

    assert!(
        results.errors.is_empty(),
        "errors should be empty when collect_errors is false"
    );
    assert!(results.excluded.is_empty());
}

#[cfg(unix)]
#[test]
fn unfollowed_symlinks_are_scanned_as_entries() {
    let dir = setup_install_dir();
    std::os::unix::fs::symlink(
        dir.path().join("src/app.php"),
        dir.path().join("src/alias.php"),
    )
    .unwrap();
    std::os::unix::fs::symlink(dir.path().join("src"), dir.path().join("src-link")).unwrap();

    let results = scan()
        .source(DirectorySource::new(dir.path()))
        .run()
        .unwrap();

    assert!(results.contains(dir.path().join("src/alias.php")));
    assert!(results.contains(dir.path().join("src-link")));
    assert!(!results.contains(dir.path().join("src-link/app.php")));
}
