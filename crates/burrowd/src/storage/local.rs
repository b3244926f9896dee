//! [`Filesystem`] implementation backed by the host filesystem.

use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use super::{Filesystem, STORAGE_TARGET, StorageError};

/// Adapter executing every operation directly against `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Builds the adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> Result<bool, StorageError> {
        path.try_exists()
            .map_err(|source| StorageError::inspect(path, source))
    }

    fn is_directory(&self, path: &Path) -> Result<bool, StorageError> {
        match fs::metadata(path) {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StorageError::inspect(path, source)),
        }
    }

    fn list_children(&self, path: &Path) -> Result<Vec<String>, StorageError> {
        let entries = fs::read_dir(path).map_err(|source| StorageError::list(path, source))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StorageError::list(path, source))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn create_file(&self, path: &Path) -> Result<(), StorageError> {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map(drop)
            .map_err(|source| StorageError::create(path, source))
    }

    fn create_directory(&self, path: &Path, recursive: bool) -> Result<(), StorageError> {
        let result = if recursive {
            fs::create_dir_all(path)
        } else {
            fs::create_dir(path)
        };
        result.map_err(|source| StorageError::create(path, source))
    }

    fn delete(&self, path: &Path) -> Result<(), StorageError> {
        let metadata =
            fs::symlink_metadata(path).map_err(|source| StorageError::inspect(path, source))?;
        let result = if metadata.is_dir() {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        };
        result.map_err(|source| StorageError::delete(path, source))
    }

    fn copy_file(
        &self,
        source: &Path,
        destination: &Path,
        overwrite: bool,
    ) -> Result<(), StorageError> {
        if !overwrite && self.exists(destination)? {
            return Err(StorageError::copy(
                source,
                destination,
                io::Error::from(io::ErrorKind::AlreadyExists),
            ));
        }
        fs::copy(source, destination)
            .map(drop)
            .map_err(|error| StorageError::copy(source, destination, error))
    }

    fn copy_tree(
        &self,
        source: &Path,
        destination: &Path,
        overwrite: bool,
    ) -> Result<(), StorageError> {
        fs::create_dir_all(destination)
            .map_err(|error| StorageError::create(destination, error))?;
        let skip = fs::canonicalize(destination)
            .map_err(|error| StorageError::inspect(destination, error))?;
        copy_tree_into(self, source, destination, &skip, overwrite)
    }

    fn read_lines(&self, path: &Path) -> Result<Vec<String>, StorageError> {
        let file = fs::File::open(path).map_err(|source| StorageError::read(path, source))?;
        BufReader::new(file)
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| StorageError::read(path, source))
    }
}

/// Recursively mirrors `source` into `destination`.
///
/// `skip` is the canonical destination root; it is never descended into so a
/// directory copied into one of its own children terminates.
fn copy_tree_into(
    filesystem: &LocalFilesystem,
    source: &Path,
    destination: &Path,
    skip: &Path,
    overwrite: bool,
) -> Result<(), StorageError> {
    let entries = fs::read_dir(source).map_err(|error| StorageError::list(source, error))?;
    for entry in entries {
        let entry = entry.map_err(|error| StorageError::list(source, error))?;
        let from = entry.path();
        let to = destination.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|error| StorageError::inspect(&from, error))?;

        if file_type.is_dir() {
            if fs::canonicalize(&from).is_ok_and(|canonical| canonical == skip) {
                debug!(
                    target: STORAGE_TARGET,
                    path = %from.display(),
                    "skipping copy destination inside its own source"
                );
                continue;
            }
            fs::create_dir_all(&to).map_err(|error| StorageError::create(&to, error))?;
            copy_tree_into(filesystem, &from, &to, skip, overwrite)?;
        } else {
            filesystem.copy_file(&from, &to, overwrite)?;
        }
    }
    Ok(())
}
