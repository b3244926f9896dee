//! Sandboxed remote shell daemon.
//!
//! `burrowd` accepts line-oriented TCP clients and gives every peer host a
//! private directory beneath the configured storage root. Clients walk and
//! edit that directory with a small command vocabulary (`ls`, `cd`, `touch`,
//! `mkdir`, `rm`, `copy`, `cat` and `changenick`), and every reply is followed
//! by a prompt of the form `<nickname> ~\path\>`.
//!
//! The crate is layered bottom-up:
//!
//! - [`storage`] wraps the host filesystem behind the [`Filesystem`] trait.
//! - [`sandbox`] maps backslash-separated protocol paths onto the sandbox.
//! - [`session`] holds per-connection nickname and working directory state.
//! - [`dispatch`] parses command lines and renders replies.
//! - [`transport`] runs the single-threaded readiness loop that multiplexes
//!   the listener and every open connection.
//!
//! [`run_daemon`] wires these together behind the bootstrap sequence: load
//! configuration, install telemetry, validate the listen address and prepare
//! the storage root. Lifecycle events are published through a
//! [`HealthReporter`] so operators can follow startup and shutdown.

mod bootstrap;
pub mod dispatch;
mod health;
mod process;
pub mod sandbox;
pub mod session;
pub mod storage;
mod telemetry;
pub mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use dispatch::{Command, CommandError, CommandRouter, Reply, ResponseWriter};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{LaunchError, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_daemon};
pub use sandbox::{Navigation, SandboxRoot};
pub use session::{ConnectionId, Session, SessionStore};
pub use storage::{Filesystem, LocalFilesystem, StorageError};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::{
    EventLoop, LineOverflow, ListenerError, ListenerHandle, LoopSettings, SocketListener,
};

#[cfg(test)]
mod tests;
