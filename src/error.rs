use std::path::PathBuf;
use thiserror::Error;

/// Errors from the traversal and configuration layer around the filter.
///
/// The filter itself is total and never produces one of these.
#[derive(Error, Debug)]
pub enum IntegrityError {
    // Traversal
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid source: {0}")]
    InvalidSource(String),

    #[error("symlink loop at {}", .0.display())]
    SymlinkLoop(PathBuf),

    #[error("IO error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walk error: {0}")]
    Walk(String),

    // Config
    #[error("invalid thread count: {0}")]
    InvalidThreadCount(usize),

    #[error("invalid exclusion config: {0}")]
    Config(String),
}

impl IntegrityError {
    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::PermissionDenied(p)
            | Self::NotFound(p)
            | Self::SymlinkLoop(p)
            | Self::Io { path: p, .. } => Some(p),
            _ => None,
        }
    }

    /// Whether the scan can continue after this error.
    ///
    /// Recoverable errors are collected into [`ScanResults::errors`](crate::ScanResults::errors)
    /// and the walk keeps going. Config and source errors halt before the walk starts.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_)
                | Self::NotFound(_)
                | Self::SymlinkLoop(_)
                | Self::Io { .. }
                | Self::Walk(_)
        )
    }
}

/// Map an `ignore::Error` onto the crate error.
pub(crate) fn from_ignore(e: ignore::Error) -> IntegrityError {
    match e {
        ignore::Error::WithPath { path, err } => match *err {
            ignore::Error::Io(io_err) => from_io(path, io_err),
            other => IntegrityError::Walk(format!("{}: {}", path.display(), other)),
        },
        ignore::Error::WithDepth { err, .. } => from_ignore(*err),
        ignore::Error::Loop { child, .. } => IntegrityError::SymlinkLoop(child),
        ignore::Error::Io(io_err) => from_io(PathBuf::new(), io_err),
        other => IntegrityError::Walk(other.to_string()),
    }
}

pub(crate) fn from_io(path: PathBuf, err: std::io::Error) -> IntegrityError {
    match err.kind() {
        std::io::ErrorKind::PermissionDenied => IntegrityError::PermissionDenied(path),
        std::io::ErrorKind::NotFound => IntegrityError::NotFound(path),
        _ => IntegrityError::Io { path, source: err },
    }
}
