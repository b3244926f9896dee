//! Command execution against a session and the filesystem adapter.
//!
//! The router turns a tokenised line into a [`Reply`]. Malformed invocations
//! are silent. Expected conditions (missing entries, collisions, non-empty
//! directories) produce short fixed messages and leave state unchanged.
//! Adapter failures are logged and collapse to [`OPERATION_FAILED`]; the
//! connection keeps working either way.

use std::path::Path;

use tracing::{debug, warn};

use crate::sandbox::{self, Navigation, SandboxRoot};
use crate::session::Session;
use crate::storage::{Filesystem, StorageError};

use super::command::Command;
use super::response::{
    CANNOT_READ_DIRECTORY, DIRECTORY_EXISTS, DIRECTORY_IN_USE, DIRECTORY_MISSING,
    DIRECTORY_NOT_EMPTY, ENTRY_MISSING, FILE_EXISTS, HELP_TEXT, OPERATION_FAILED, Reply,
    SOURCE_MISSING,
};

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Executes shell commands on behalf of sessions.
#[derive(Debug, Default, Clone)]
pub struct CommandRouter<F> {
    filesystem: F,
}

impl<F: Filesystem> CommandRouter<F> {
    /// Creates a router over the given filesystem adapter.
    pub const fn new(filesystem: F) -> Self {
        Self { filesystem }
    }

    /// Ensures a sandbox directory exists, creating it with its parents.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the directory cannot be inspected or
    /// created.
    pub fn open_sandbox(&self, root: &SandboxRoot) -> Result<(), StorageError> {
        if self.filesystem.is_directory(root.path())? {
            return Ok(());
        }
        self.filesystem.create_directory(root.path(), true)
    }

    /// Parses and executes one command line.
    pub fn dispatch(&self, session: &mut Session, tokens: &[&str]) -> Reply {
        let command = match Command::parse(tokens) {
            Ok(command) => command,
            Err(error) => {
                debug!(
                    target: DISPATCH_TARGET,
                    error = %error,
                    "ignoring malformed command"
                );
                return Reply::Silent;
            }
        };

        debug!(
            target: DISPATCH_TARGET,
            command = command.keyword(),
            nickname = session.nickname(),
            "routing command"
        );

        match self.execute(session, &command) {
            Ok(reply) => reply,
            Err(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    command = command.keyword(),
                    error = %error,
                    "filesystem operation failed"
                );
                Reply::text(OPERATION_FAILED)
            }
        }
    }

    fn execute(&self, session: &mut Session, command: &Command) -> Result<Reply, StorageError> {
        match command {
            Command::Help => Ok(Reply::text(HELP_TEXT)),
            Command::List => self.list(session),
            Command::ChangeNick { nickname } => {
                session.set_nickname(nickname.as_str());
                Ok(Reply::prompt_only())
            }
            Command::ChangeDirectory { target } => self.change_directory(session, target),
            Command::Touch { path } => self.touch(&sandbox::resolve(session, path)),
            Command::MakeDirectory { path } => {
                self.make_directory(&sandbox::resolve(session, path))
            }
            Command::Remove { path } => self.remove(session, &sandbox::resolve(session, path)),
            Command::Copy {
                source,
                destination,
            } => self.copy(
                &sandbox::resolve(session, source),
                &sandbox::resolve(session, destination),
            ),
            Command::Cat { path } => self.cat(&sandbox::resolve(session, path)),
            Command::Unknown { name } => {
                debug!(
                    target: DISPATCH_TARGET,
                    command = name.as_str(),
                    "ignoring unknown command"
                );
                Ok(Reply::Silent)
            }
        }
    }

    fn list(&self, session: &Session) -> Result<Reply, StorageError> {
        let names = self.filesystem.list_children(session.current_dir())?;
        let mut body = names.join(" ");
        body.push('\n');
        Ok(Reply::Text(body))
    }

    fn change_directory(&self, session: &mut Session, target: &str) -> Result<Reply, StorageError> {
        match sandbox::navigate(session, target) {
            Navigation::Home => session.return_home(),
            Navigation::Parent => session.ascend(),
            Navigation::Target(path) => {
                if !self.filesystem.is_directory(&path)? {
                    return Ok(Reply::text(DIRECTORY_MISSING));
                }
                session.change_directory(path);
            }
        }
        Ok(Reply::prompt_only())
    }

    fn touch(&self, path: &Path) -> Result<Reply, StorageError> {
        if self.filesystem.exists(path)? {
            return Ok(Reply::text(FILE_EXISTS));
        }
        self.filesystem.create_file(path)?;
        Ok(Reply::prompt_only())
    }

    fn make_directory(&self, path: &Path) -> Result<Reply, StorageError> {
        if self.filesystem.exists(path)? {
            return Ok(Reply::text(DIRECTORY_EXISTS));
        }
        self.filesystem.create_directory(path, true)?;
        Ok(Reply::prompt_only())
    }

    fn remove(&self, session: &Session, path: &Path) -> Result<Reply, StorageError> {
        // The sandbox root and every directory above the caller stay in place.
        if session.current_dir().starts_with(path) {
            return Ok(Reply::text(DIRECTORY_IN_USE));
        }
        if !self.filesystem.exists(path)? {
            return Ok(Reply::text(ENTRY_MISSING));
        }
        if self.filesystem.is_directory(path)? && !self.filesystem.list_children(path)?.is_empty()
        {
            return Ok(Reply::text(DIRECTORY_NOT_EMPTY));
        }
        self.filesystem.delete(path)?;
        Ok(Reply::prompt_only())
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<Reply, StorageError> {
        if !self.filesystem.exists(source)? {
            return Ok(Reply::text(SOURCE_MISSING));
        }
        if self.filesystem.is_directory(source)? {
            self.filesystem.copy_tree(source, destination, true)?;
        } else {
            self.filesystem.copy_file(source, destination, true)?;
        }
        Ok(Reply::prompt_only())
    }

    fn cat(&self, path: &Path) -> Result<Reply, StorageError> {
        if self.filesystem.is_directory(path)? {
            return Ok(Reply::text(CANNOT_READ_DIRECTORY));
        }
        if !self.filesystem.exists(path)? {
            return Ok(Reply::text(ENTRY_MISSING));
        }
        let body = self
            .filesystem
            .read_lines(path)?
            .into_iter()
            .fold(String::new(), |mut body, line| {
                body.push_str(&line);
                body.push('\n');
                body
            });
        Ok(Reply::Text(body))
    }
}
