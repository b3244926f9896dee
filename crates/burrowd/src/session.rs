//! Per-connection shell state.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::sandbox::{SandboxRoot, render_location};

/// Stable identity of an accepted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wraps a raw token.
    #[must_use]
    pub const fn new(token: u64) -> Self {
        Self(token)
    }

    /// Returns the raw token.
    #[must_use]
    pub const fn token(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

/// Shell state owned by one live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    nickname: String,
    current_dir: PathBuf,
    root: SandboxRoot,
}

impl Session {
    /// Opens a session at the sandbox root, named after the host identifier.
    #[must_use]
    pub fn new(root: SandboxRoot) -> Self {
        Self {
            nickname: root.identifier().to_owned(),
            current_dir: root.path().to_path_buf(),
            root,
        }
    }

    /// Display name shown in the prompt.
    #[must_use]
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Directory that relative paths resolve against.
    #[must_use]
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// Sandbox the session is confined to.
    #[must_use]
    pub const fn root(&self) -> &SandboxRoot {
        &self.root
    }

    /// Replaces the display name. The sandbox binding is unaffected.
    pub fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
    }

    /// Moves to an already validated directory.
    pub fn change_directory(&mut self, target: PathBuf) {
        self.current_dir = target;
    }

    /// Moves back to the sandbox root.
    pub fn return_home(&mut self) {
        self.current_dir = self.root.path().to_path_buf();
    }

    /// Moves to the parent directory. Does nothing at the sandbox root.
    pub fn ascend(&mut self) {
        if self.is_at_root() {
            return;
        }
        if let Some(parent) = self.current_dir.parent() {
            self.current_dir = parent.to_path_buf();
        }
    }

    /// Reports whether the current directory is the sandbox root.
    #[must_use]
    pub fn is_at_root(&self) -> bool {
        self.current_dir == self.root.path()
    }

    /// Location segment of the prompt, e.g. `~\docs\`.
    #[must_use]
    pub fn location(&self) -> String {
        render_location(self.root.path(), &self.current_dir)
    }
}

/// Sessions of every live connection, keyed by connection identity.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<ConnectionId, Session>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the session opened for a freshly accepted connection.
    pub fn open(&mut self, id: ConnectionId, session: Session) {
        self.sessions.insert(id, session);
    }

    /// Looks up the session of a connection for mutation.
    pub fn get_mut(&mut self, id: ConnectionId) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    /// Looks up the session of a connection.
    #[must_use]
    pub fn get(&self, id: ConnectionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Destroys the session of a closed connection.
    pub fn close(&mut self, id: ConnectionId) -> Option<Session> {
        self.sessions.remove(&id)
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Reports whether no session is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drops every session.
    pub fn clear(&mut self) {
        self.sessions.clear();
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn session() -> Session {
        Session::new(SandboxRoot::new(Path::new("/srv/burrow"), "192.168.1.5"))
    }

    #[rstest]
    fn new_session_starts_at_root_named_after_host(session: Session) {
        assert_eq!(session.nickname(), "192.168.1.5");
        assert_eq!(session.current_dir(), Path::new("/srv/burrow/192.168.1.5"));
        assert_eq!(session.location(), "~\\");
    }

    #[rstest]
    fn ascend_at_root_is_a_no_op(mut session: Session) {
        session.ascend();

        assert!(session.is_at_root());
    }

    #[rstest]
    fn ascend_returns_to_previous_directory(mut session: Session) {
        let start = session.current_dir().to_path_buf();
        session.change_directory(start.join("docs"));

        session.ascend();

        assert_eq!(session.current_dir(), start);
    }

    #[rstest]
    fn changing_nickname_keeps_sandbox(mut session: Session) {
        let root = session.root().clone();

        session.set_nickname("alice");

        assert_eq!(session.nickname(), "alice");
        assert_eq!(session.root(), &root);
    }

    #[rstest]
    fn store_tracks_open_and_closed_sessions(session: Session) {
        let mut store = SessionStore::new();
        let id = ConnectionId::new(7);

        store.open(id, session);
        assert_eq!(store.len(), 1);
        assert!(store.get(id).is_some());

        assert!(store.close(id).is_some());
        assert!(store.is_empty());
        assert!(store.get(id).is_none());
    }
}
