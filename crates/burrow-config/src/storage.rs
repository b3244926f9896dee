use std::fs::{self, DirBuilder};
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Errors raised when preparing the storage root.
#[derive(Debug, Error)]
pub enum StoragePreparationError {
    /// Creating the storage directory failed.
    #[error("failed to create storage root '{path}': {source}")]
    CreateDirectory {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The storage root exists but is not a directory.
    #[error("storage root '{path}' is not a directory")]
    NotDirectory {
        /// Offending path.
        path: Utf8PathBuf,
    },
}

pub(crate) fn prepare(path: &Utf8Path) -> Result<(), StoragePreparationError> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    if let Err(source) = builder.create(path.as_std_path())
        && source.kind() != io::ErrorKind::AlreadyExists
    {
        return Err(StoragePreparationError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        });
    }

    match fs::metadata(path.as_std_path()) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(StoragePreparationError::NotDirectory {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(StoragePreparationError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        }),
    }
}
