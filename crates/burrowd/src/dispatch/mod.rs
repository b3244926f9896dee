//! Shell command dispatch.
//!
//! Each complete input line is split on whitespace and parsed into a
//! [`Command`]. The first token selects the command and is matched exactly
//! against `--help`, `ls`, `changenick`, `cd`, `touch`, `mkdir`, `rm`, `copy`
//! and `cat`. The [`CommandRouter`] executes it against the caller's
//! [`crate::session::Session`] through the [`crate::storage::Filesystem`]
//! adapter and yields a [`Reply`].
//!
//! ## Protocol
//!
//! ```text
//! Hello user 10.0.0.7!
//! Enter --help for support info
//! 10.0.0.7 ~\>mkdir docs
//!
//! 10.0.0.7 ~\>cd docs
//!
//! 10.0.0.7 ~\docs\>cd nowhere
//! Directory doesn't exist
//! 10.0.0.7 ~\docs\>
//! ```
//!
//! Unknown commands and commands missing arguments produce no output and no
//! prompt.

mod command;
mod errors;
mod response;
mod router;

pub use self::command::Command;
pub use self::errors::CommandError;
pub use self::response::{Reply, ResponseWriter};
pub use self::router::CommandRouter;
