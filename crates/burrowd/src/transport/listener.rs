//! TCP listener binding and the background event-loop thread.

use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;

use burrow_config::ListenAddress;
use tracing::info;

use crate::dispatch::CommandRouter;
use crate::storage::Filesystem;

use super::event_loop::{EventLoop, LoopSettings};
use super::{LISTENER_TARGET, ListenerError};

/// Listener bound to the configured TCP address.
#[derive(Debug)]
pub struct SocketListener {
    address: ListenAddress,
    listener: TcpListener,
}

impl SocketListener {
    /// Resolves and binds the listen address.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError`] when the host cannot be resolved or the bind
    /// fails.
    pub fn bind(address: &ListenAddress) -> Result<Self, ListenerError> {
        let listener = bind_tcp(address.host(), address.port())?;
        info!(
            target: LISTENER_TARGET,
            address = %address,
            local_addr = ?listener.local_addr().ok(),
            "listener bound"
        );
        Ok(Self {
            address: address.clone(),
            listener,
        })
    }

    /// Address the socket is bound to, useful when binding to port 0.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr().ok()
    }

    /// Configured address the listener was bound from.
    #[must_use]
    pub const fn address(&self) -> &ListenAddress {
        &self.address
    }

    pub(crate) fn into_inner(self) -> TcpListener {
        self.listener
    }

    /// Starts the event loop on a dedicated thread.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::NonBlocking`] when the listener cannot be made
    /// non-blocking.
    pub fn start<F>(
        self,
        settings: LoopSettings,
        filesystem: F,
    ) -> Result<ListenerHandle, ListenerError>
    where
        F: Filesystem + 'static,
    {
        let local_addr = self.local_addr();
        let mut event_loop = EventLoop::new(self, settings, CommandRouter::new(filesystem))?;
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);
        let handle = thread::spawn(move || event_loop.run(&shutdown_flag));
        Ok(ListenerHandle {
            shutdown,
            handle: Some(handle),
            local_addr,
        })
    }
}

/// Handle to the background event-loop thread.
#[derive(Debug)]
pub struct ListenerHandle {
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
    local_addr: Option<SocketAddr>,
}

impl ListenerHandle {
    /// Address the loop accepts connections on.
    #[must_use]
    pub const fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Asks the loop to stop after its current cycle.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Waits for the loop thread to finish.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::ThreadPanic`] when the loop thread panicked.
    pub fn join(mut self) -> Result<(), ListenerError> {
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(()) => Ok(()),
                Err(_) => Err(ListenerError::ThreadPanic),
            }
        } else {
            Ok(())
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn bind_tcp(host: &str, port: u16) -> Result<TcpListener, ListenerError> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| ListenerError::Resolve {
            host: host.to_owned(),
            port,
            source,
        })?;
    let addr = addrs
        .find(|addr| matches!(addr, SocketAddr::V4(_) | SocketAddr::V6(_)))
        .ok_or_else(|| ListenerError::ResolveEmpty {
            host: host.to_owned(),
            port,
        })?;
    TcpListener::bind(addr).map_err(|source| ListenerError::BindTcp { addr, source })
}
