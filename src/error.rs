use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::pool::TaskError;

#[derive(Error, Debug)]
pub enum LsError {
    // Probe / directory
    #[error("{}: No such file or directory", .0.display())]
    NotFound(PathBuf),

    #[error("{}: Permission denied", .0.display())]
    PermissionDenied(PathBuf),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: cannot read link target: {source}", .path.display())]
    LinkUnresolved {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // Runtime
    #[error("{}: {source}", .path.display())]
    Task {
        path: PathBuf,
        #[source]
        source: TaskError,
    },

    #[error("invalid thread count: {0}")]
    InvalidThreadCount(usize),

    #[error("worker pool failure: {0}")]
    ThreadPool(String),

    // Renderer
    #[error("write error: {0}")]
    Output(#[source] io::Error),
}

impl LsError {
    /// Classify an I/O failure at `path` into the listing error taxonomy.
    pub fn from_io(path: impl AsRef<Path>, err: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound         => Self::NotFound(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _                               => Self::Io { path, source: err },
        }
    }

    /// The path this error occurred at, if applicable.
    /// Renderers use this to attribute a failure without matching on variants.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::Io { path: p, .. }
            | Self::LinkUnresolved { path: p, .. }
            | Self::Task { path: p, .. } => Some(p),
            _ => None,
        }
    }

    /// Whether the listing can continue after this error.
    ///
    /// Per-path failures are reported and the affected entry or directory is
    /// left out; sibling work keeps going. Pool, configuration and output
    /// failures end the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::PermissionDenied(_)
                | Self::Io { .. }
                | Self::LinkUnresolved { .. }
                | Self::Task { .. }
        )
    }
}
