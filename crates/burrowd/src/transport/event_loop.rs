//! Single-threaded readiness loop multiplexing every client connection.
//!
//! Readiness is discovered with non-blocking sockets: the listener is polled
//! with `accept` and each connection with `peek`. Events are then handled one
//! at a time to completion, so per-connection commands run strictly in the
//! order they arrive and no state is shared with other threads apart from the
//! shutdown flag. A cycle without events sleeps for [`IDLE_BACKOFF`].
//! Connections whose peer leaves too much output unread are not read from
//! until their queue drains.

use std::collections::BTreeMap;
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use burrow_config::Config;
use tracing::{debug, info, warn};

use crate::dispatch::{CommandRouter, ResponseWriter};
use crate::sandbox::SandboxRoot;
use crate::session::{ConnectionId, Session, SessionStore};
use crate::storage::Filesystem;

use super::connection::{Connection, ReadOutcome};
use super::listener::SocketListener;
use super::{LISTENER_TARGET, ListenerError};

/// Pause between polling cycles that observed no readiness.
pub(crate) const IDLE_BACKOFF: Duration = Duration::from_millis(5);

/// Tunables the loop needs from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopSettings {
    storage_root: PathBuf,
    read_buffer_bytes: usize,
    max_line_bytes: usize,
}

impl LoopSettings {
    /// Builds settings from explicit values.
    ///
    /// The read buffer holds at least one byte and the line limit is never
    /// smaller than the read buffer.
    #[must_use]
    pub fn new(
        storage_root: impl Into<PathBuf>,
        read_buffer_bytes: usize,
        max_line_bytes: usize,
    ) -> Self {
        let read_buffer_bytes = read_buffer_bytes.max(1);
        Self {
            storage_root: storage_root.into(),
            read_buffer_bytes,
            max_line_bytes: max_line_bytes.max(read_buffer_bytes),
        }
    }

    /// Extracts the loop settings from a resolved configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.storage_root().as_std_path(),
            config.read_buffer_bytes(),
            config.max_line_bytes(),
        )
    }

    /// Directory holding every sandbox root.
    #[must_use]
    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }
}

/// Readiness observed during one polling cycle.
#[derive(Debug)]
enum Event {
    Acceptable(TcpStream, SocketAddr),
    Readable(ConnectionId),
    Writable(ConnectionId),
}

/// Event loop owning the listener, every connection and every session.
#[derive(Debug)]
pub struct EventLoop<F> {
    listener: TcpListener,
    local_addr: Option<SocketAddr>,
    router: CommandRouter<F>,
    settings: LoopSettings,
    connections: BTreeMap<ConnectionId, Connection>,
    sessions: SessionStore,
    scratch: Vec<u8>,
    next_token: u64,
    last_accept_error: Option<io::ErrorKind>,
}

impl<F: Filesystem> EventLoop<F> {
    /// Takes ownership of a bound listener and switches it to non-blocking
    /// mode.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::NonBlocking`] when the listener cannot be made
    /// non-blocking.
    pub fn new(
        listener: SocketListener,
        settings: LoopSettings,
        router: CommandRouter<F>,
    ) -> Result<Self, ListenerError> {
        let local_addr = listener.local_addr();
        let listener = listener.into_inner();
        listener
            .set_nonblocking(true)
            .map_err(|source| ListenerError::NonBlocking { source })?;
        Ok(Self {
            listener,
            local_addr,
            router,
            scratch: vec![0_u8; settings.read_buffer_bytes],
            settings,
            connections: BTreeMap::new(),
            sessions: SessionStore::new(),
            next_token: 0,
            last_accept_error: None,
        })
    }

    /// Address the listener is bound to, when the OS reports one.
    #[must_use]
    pub const fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Number of open connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Runs until `shutdown` is raised, then closes every connection.
    pub fn run(&mut self, shutdown: &AtomicBool) {
        info!(
            target: LISTENER_TARGET,
            address = ?self.local_addr,
            storage_root = %self.settings.storage_root.display(),
            "event loop active"
        );
        while !shutdown.load(Ordering::SeqCst) {
            if !self.turn() {
                thread::sleep(IDLE_BACKOFF);
            }
        }
        self.close_all();
        info!(target: LISTENER_TARGET, "event loop stopped");
    }

    /// Polls once and handles every observed event.
    ///
    /// Returns `false` when nothing was ready.
    pub fn turn(&mut self) -> bool {
        let events = self.poll();
        if events.is_empty() {
            return false;
        }
        for event in events {
            self.handle(event);
        }
        true
    }

    fn poll(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        loop {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    self.last_accept_error = None;
                    events.push(Event::Acceptable(stream, peer));
                }
                Err(error) if error.kind() == io::ErrorKind::WouldBlock => break,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) => {
                    let kind = error.kind();
                    if self.last_accept_error != Some(kind) {
                        warn!(
                            target: LISTENER_TARGET,
                            error = %error,
                            "socket accept error"
                        );
                    }
                    self.last_accept_error = Some(kind);
                    break;
                }
            }
        }

        for connection in self.connections.values() {
            if connection.has_outbound() {
                events.push(Event::Writable(connection.id()));
            }
            if !connection.is_backlogged() && connection.is_readable() {
                events.push(Event::Readable(connection.id()));
            }
        }
        events
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Acceptable(stream, peer) => self.accept(stream, peer),
            Event::Readable(id) => self.read(id),
            Event::Writable(id) => self.write(id),
        }
    }

    fn accept(&mut self, stream: TcpStream, peer: SocketAddr) {
        if let Err(error) = stream.set_nonblocking(true) {
            warn!(
                target: LISTENER_TARGET,
                peer = %peer,
                error = %error,
                "failed to configure accepted connection"
            );
            return;
        }

        let root = SandboxRoot::for_peer(&self.settings.storage_root, peer.ip());
        if let Err(error) = self.router.open_sandbox(&root) {
            warn!(
                target: LISTENER_TARGET,
                peer = %peer,
                error = %error,
                "failed to create sandbox root, dropping connection"
            );
            return;
        }

        let id = ConnectionId::new(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        let session = Session::new(root);
        let mut connection = Connection::new(id, peer, stream, self.settings.max_line_bytes);
        if let Err(error) = ResponseWriter::new(connection.outbound()).write_greeting(&session) {
            warn!(
                target: LISTENER_TARGET,
                connection = %id,
                error = %error,
                "failed to queue greeting"
            );
            return;
        }

        info!(
            target: LISTENER_TARGET,
            connection = %id,
            peer = %peer,
            nickname = session.nickname(),
            "client connected"
        );
        self.sessions.open(id, session);
        self.connections.insert(id, connection);
    }

    fn read(&mut self, id: ConnectionId) {
        let Some(connection) = self.connections.get_mut(&id) else {
            return;
        };
        let outcome = connection.read(&mut self.scratch);
        let line = match outcome {
            ReadOutcome::WouldBlock => return,
            ReadOutcome::Closed => {
                self.close(id, None);
                return;
            }
            ReadOutcome::Failed(error) => {
                self.close(id, Some(&error));
                return;
            }
            ReadOutcome::Data(count) => {
                let received = self.scratch.get(..count).unwrap_or_default();
                match connection.receive(received) {
                    Ok(Some(line)) => line,
                    Ok(None) => return,
                    Err(overflow) => {
                        warn!(
                            target: LISTENER_TARGET,
                            connection = %id,
                            error = %overflow,
                            "command line too long"
                        );
                        return;
                    }
                }
            }
        };

        let Some(session) = self.sessions.get_mut(id) else {
            return;
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let reply = self.router.dispatch(session, &tokens);
        let mut writer = ResponseWriter::new(connection.outbound());
        if let Err(error) = writer.write_reply(&reply, session) {
            warn!(
                target: LISTENER_TARGET,
                connection = %id,
                error = %error,
                "failed to queue reply"
            );
        }
    }

    fn write(&mut self, id: ConnectionId) {
        let Some(connection) = self.connections.get_mut(&id) else {
            return;
        };
        if let Err(error) = connection.flush() {
            self.close(id, Some(&error));
        }
    }

    fn close(&mut self, id: ConnectionId, error: Option<&io::Error>) {
        let session = self.sessions.close(id);
        let Some(connection) = self.connections.remove(&id) else {
            return;
        };
        let peer = connection.peer();
        connection.close();
        match error {
            Some(error) => debug!(
                target: LISTENER_TARGET,
                connection = %id,
                peer = %peer,
                error = %error,
                "connection failed"
            ),
            None => info!(
                target: LISTENER_TARGET,
                connection = %id,
                peer = %peer,
                nickname = session.as_ref().map(Session::nickname),
                "client disconnected"
            ),
        }
    }

    fn close_all(&mut self) {
        let count = self.connections.len();
        for (_, connection) in std::mem::take(&mut self.connections) {
            connection.close();
        }
        self.sessions.clear();
        if count > 0 {
            info!(
                target: LISTENER_TARGET,
                connections = count,
                "closed connections on shutdown"
            );
        }
    }
}
