//! Reply rendering for the shell protocol.
//!
//! Replies are plain UTF-8 text. Domain messages carry no trailing line feed;
//! the invite prompt that follows every handled command starts with one.

use std::io::{self, Write};

use crate::session::Session;

/// Reported when `cd` targets something that is not an existing directory.
pub const DIRECTORY_MISSING: &str = "Directory doesn't exist";
/// Reported when `touch` targets an existing entry.
pub const FILE_EXISTS: &str = "File is already exist";
/// Reported when `mkdir` targets an existing entry.
pub const DIRECTORY_EXISTS: &str = "Directory is already exist";
/// Reported when `rm` or `cat` targets a missing entry.
pub const ENTRY_MISSING: &str = "File or directory doesn't exist";
/// Reported when `rm` targets a directory with children.
pub const DIRECTORY_NOT_EMPTY: &str = "Directory is not empty";
/// Reported when `rm` targets the sandbox root or the current directory.
pub const DIRECTORY_IN_USE: &str = "Can't remove current directory";
/// Reported when `copy` names a missing source.
pub const SOURCE_MISSING: &str = "Source file doesn't exist";
/// Reported when `cat` targets a directory.
pub const CANNOT_READ_DIRECTORY: &str = "Can't read directory";
/// Reported when the filesystem adapter fails.
pub const OPERATION_FAILED: &str = "Operation failed";

/// Help text listing every command, one tab-prefixed line each, every line
/// terminated.
pub const HELP_TEXT: &str = concat!(
    "\tls          view all files from current directory\n",
    "\tmkdir       create new directory\n",
    "\ttouch       create new file\n",
    "\tcd          change current directory\n",
    "\trm          delete file or directory\n",
    "\tcopy        copy file or directory\n",
    "\tcat         print text file\n",
    "\tchangenick  change nickname\n",
);

/// Outcome of dispatching one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Malformed invocation: nothing is written, not even a prompt.
    Silent,
    /// Text written back, followed by a fresh prompt.
    Text(String),
}

impl Reply {
    /// Builds a text reply.
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text(body.into())
    }

    /// Builds a reply without a body that still re-issues the prompt.
    #[must_use]
    pub const fn prompt_only() -> Self {
        Self::Text(String::new())
    }
}

/// Renders the invite prompt, e.g. `"\nalice ~\docs\>"`.
#[must_use]
pub fn prompt(session: &Session) -> String {
    format!("\n{} {}>", session.nickname(), session.location())
}

/// Renders the two greeting lines sent right after accept.
#[must_use]
pub fn greeting(session: &Session) -> String {
    format!(
        "Hello user {}!\nEnter --help for support info",
        session.nickname()
    )
}

/// Writer that frames replies and prompts onto an output stream.
pub struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Creates a writer wrapping the given output.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes the greeting followed by the first prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_greeting(&mut self, session: &Session) -> io::Result<()> {
        self.writer.write_all(greeting(session).as_bytes())?;
        self.writer.write_all(prompt(session).as_bytes())
    }

    /// Writes a reply and, unless it is silent, a fresh prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_reply(&mut self, reply: &Reply, session: &Session) -> io::Result<()> {
        match reply {
            Reply::Silent => Ok(()),
            Reply::Text(body) => {
                self.writer.write_all(body.as_bytes())?;
                self.writer.write_all(prompt(session).as_bytes())
            }
        }
    }

    /// Unwraps the inner output.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
