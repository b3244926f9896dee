//! Filesystem adapter consumed by the command dispatcher.
//!
//! The dispatcher never touches `std::fs` directly. Every storage effect goes
//! through the [`Filesystem`] trait so the event loop can be exercised against
//! a real directory tree ([`LocalFilesystem`]) or a test double that injects
//! failures. All operations are synchronous; they run to completion on the
//! event-loop thread.

mod errors;
mod local;

use std::path::Path;

pub use self::errors::StorageError;
pub use self::local::LocalFilesystem;

/// Tracing target for storage operations.
pub(crate) const STORAGE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::storage");

/// Plain file and directory primitives used by the shell commands.
pub trait Filesystem: Send {
    /// Reports whether anything exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the existence check itself fails.
    fn exists(&self, path: &Path) -> Result<bool, StorageError>;

    /// Reports whether `path` is an existing directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when metadata cannot be read for a reason
    /// other than the path being absent.
    fn is_directory(&self, path: &Path) -> Result<bool, StorageError>;

    /// Lists the names of the immediate children of a directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the directory cannot be read.
    fn list_children(&self, path: &Path) -> Result<Vec<String>, StorageError>;

    /// Creates a new empty file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the file already exists or cannot be
    /// created.
    fn create_file(&self, path: &Path) -> Result<(), StorageError>;

    /// Creates a directory, optionally with all missing parents.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the directory cannot be created.
    fn create_directory(&self, path: &Path, recursive: bool) -> Result<(), StorageError>;

    /// Deletes a file or an empty directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the entry cannot be removed.
    fn delete(&self, path: &Path) -> Result<(), StorageError>;

    /// Copies a single file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the copy fails, or when `destination`
    /// exists and `overwrite` is false.
    fn copy_file(&self, source: &Path, destination: &Path, overwrite: bool)
    -> Result<(), StorageError>;

    /// Copies the contents of a directory into `destination`, recursively.
    ///
    /// `destination` is created when missing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] on the first entry that cannot be copied.
    fn copy_tree(&self, source: &Path, destination: &Path, overwrite: bool)
    -> Result<(), StorageError>;

    /// Reads a UTF-8 text file as a sequence of lines without terminators.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the file cannot be read or is not valid
    /// UTF-8.
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, StorageError>;
}
