//! Error types for filesystem adapter operations.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures reported by a [`super::Filesystem`] implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Metadata lookup failed.
    #[error("failed to inspect '{}': {source}", path.display())]
    Inspect {
        /// Path being inspected.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Reading a directory listing failed.
    #[error("failed to list '{}': {source}", path.display())]
    List {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Creating a file or directory failed.
    #[error("failed to create '{}': {source}", path.display())]
    Create {
        /// Path being created.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Removing an entry failed.
    #[error("failed to delete '{}': {source}", path.display())]
    Delete {
        /// Path being removed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Copying an entry failed.
    #[error("failed to copy '{}' to '{}': {source}", from.display(), to.display())]
    Copy {
        /// Entry being copied.
        from: PathBuf,
        /// Copy destination.
        to: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Reading file content failed.
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        /// File being read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Creates an inspection error.
    pub fn inspect(path: &Path, source: io::Error) -> Self {
        Self::Inspect {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates a listing error.
    pub fn list(path: &Path, source: io::Error) -> Self {
        Self::List {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates a creation error.
    pub fn create(path: &Path, source: io::Error) -> Self {
        Self::Create {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates a deletion error.
    pub fn delete(path: &Path, source: io::Error) -> Self {
        Self::Delete {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates a copy error.
    pub fn copy(from: &Path, to: &Path, source: io::Error) -> Self {
        Self::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        }
    }

    /// Creates a read error.
    pub fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns the IO error kind behind the failure.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Inspect { source, .. }
            | Self::List { source, .. }
            | Self::Create { source, .. }
            | Self::Delete { source, .. }
            | Self::Copy { source, .. }
            | Self::Read { source, .. } => source.kind(),
        }
    }
}
