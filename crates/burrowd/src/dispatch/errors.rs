//! Error types for command line parsing.

use thiserror::Error;

/// Reasons a command line cannot be turned into a [`super::Command`].
///
/// Parse failures are never reported to the client: a malformed invocation
/// produces no output at all. The variants exist for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The line held no tokens.
    #[error("empty command line")]
    Empty,
    /// A recognised command was given fewer arguments than it needs.
    #[error("'{command}' expects {expected} argument(s), received {found}")]
    MissingArguments {
        /// Command keyword as typed.
        command: &'static str,
        /// Number of arguments required.
        expected: usize,
        /// Number of arguments supplied.
        found: usize,
    },
}

impl CommandError {
    /// Creates an arity error.
    pub const fn missing_arguments(command: &'static str, expected: usize, found: usize) -> Self {
        Self::MissingArguments {
            command,
            expected,
            found,
        }
    }
}
