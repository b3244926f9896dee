//! TCP transport for the shell protocol.
//!
//! The transport binds the configured listen address and drives every client
//! from a single event loop thread: accepting, greeting, reassembling lines,
//! dispatching them and flushing replies back to the same connection.

mod connection;
mod errors;
mod event_loop;
mod listener;

pub use self::errors::{LineOverflow, ListenerError};
pub use self::event_loop::{EventLoop, LoopSettings};
pub use self::listener::{ListenerHandle, SocketListener};

const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
