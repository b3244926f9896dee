//! Virtual path resolution inside a per-host sandbox.
//!
//! Clients address files with backslash-separated paths regardless of the
//! host platform. A single segment is resolved against the session's current
//! directory; several segments are resolved against the sandbox root. The
//! resolver is pure: it never touches the filesystem, so existence checks are
//! left to the dispatcher.

use std::net::IpAddr;
use std::path::{Component, Path, PathBuf};

use crate::session::Session;

/// Separator used by clients between path segments.
pub const PROTOCOL_SEPARATOR: char = '\\';

const HOME_ALIAS: &str = "~";
const PARENT_ALIAS: &str = "..";

/// Directory that confines every session opened from one client host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxRoot {
    path: PathBuf,
    identifier: String,
}

impl SandboxRoot {
    /// Builds a sandbox root under `storage_root` for an explicit identifier.
    #[must_use]
    pub fn new(storage_root: &Path, identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self {
            path: storage_root.join(&identifier),
            identifier,
        }
    }

    /// Builds the sandbox root assigned to a peer address.
    ///
    /// The textual IP address identifies the host, so reconnecting clients and
    /// simultaneous connections from the same host share the directory.
    #[must_use]
    pub fn for_peer(storage_root: &Path, peer: IpAddr) -> Self {
        Self::new(storage_root, peer.to_string())
    }

    /// Absolute location of the sandbox on the host filesystem.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Host identifier the sandbox was derived from.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// Outcome of interpreting a `cd` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Return to the sandbox root.
    Home,
    /// Move to the parent of the current directory, stopping at the root.
    Parent,
    /// Move to a resolved path, subject to it being an existing directory.
    Target(PathBuf),
}

/// Resolves a client path argument to a host path.
#[must_use]
pub fn resolve(session: &Session, argument: &str) -> PathBuf {
    let segments = segments(argument);
    match segments.as_slice() {
        [single] => session.current_dir().join(single),
        many => many
            .iter()
            .filter(|segment| !segment.is_empty())
            .fold(session.root().path().to_path_buf(), |path, segment| {
                path.join(segment)
            }),
    }
}

/// Interprets the argument of a `cd` command.
#[must_use]
pub fn navigate(session: &Session, argument: &str) -> Navigation {
    match argument {
        HOME_ALIAS => Navigation::Home,
        PARENT_ALIAS => Navigation::Parent,
        other => Navigation::Target(resolve(session, other)),
    }
}

/// Renders the location part of the prompt, e.g. `~\docs\notes\`.
#[must_use]
pub fn render_location(root: &Path, current: &Path) -> String {
    let relative = current.strip_prefix(root).unwrap_or(current);
    let mut rendered = String::from(HOME_ALIAS);
    rendered.push(PROTOCOL_SEPARATOR);
    for component in relative.components() {
        let text = match component {
            Component::Normal(name) => name.to_string_lossy(),
            Component::ParentDir => PARENT_ALIAS.into(),
            Component::RootDir | Component::CurDir | Component::Prefix(_) => continue,
        };
        rendered.push_str(&text);
        rendered.push(PROTOCOL_SEPARATOR);
    }
    rendered
}

/// Splits an argument on the protocol separator, dropping trailing empty
/// segments.
fn segments(argument: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = argument.split(PROTOCOL_SEPARATOR).collect();
    while parts.last().is_some_and(|part| part.is_empty()) {
        parts.pop();
    }
    parts
}
